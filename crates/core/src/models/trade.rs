use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wheel leg type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    #[serde(rename = "Sell Put")]
    SellPut,
    #[serde(rename = "Sell Call")]
    SellCall,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::SellPut => write!(f, "Sell Put"),
            TradeType::SellCall => write!(f, "Sell Call"),
        }
    }
}

/// Lifecycle of a single option position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Open,
    Expired,
    Assigned,
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStatus::Open => write!(f, "Open"),
            TradeStatus::Expired => write!(f, "Expired"),
            TradeStatus::Assigned => write!(f, "Assigned"),
        }
    }
}

/// A single journal entry: one sold put or call booked against a strategy.
///
/// `strategy_id` must reference a strategy the user owns; guest mode has no
/// ownership and does not enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Same assignment rule as `Strategy::id`: set once, never changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,

    pub date: NaiveDate,

    #[serde(rename = "strategyId")]
    pub strategy_id: i64,

    #[serde(rename = "type")]
    pub trade_type: TradeType,

    pub strike: f64,

    /// Position size in BTC.
    pub size: f64,

    /// Premium collected, in USD.
    pub premium: f64,

    /// Underlying BTC price at trade time.
    #[serde(rename = "btcPrice")]
    pub btc_price: f64,

    pub status: TradeStatus,

    /// Set when the capital-guarantee condition fired for this position.
    #[serde(rename = "isWarrantyTriggered")]
    pub is_warranty_triggered: bool,

    #[serde(
        rename = "bonusAmount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bonus_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
