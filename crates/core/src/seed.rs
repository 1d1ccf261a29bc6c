//! Sample data backing guest mode.
//!
//! Guest mode has no durable store; these entities are what a fresh guest
//! session loads. Ids are fixed so trades can reference their strategies.

use chrono::NaiveDate;

use crate::models::strategy::{Frequency, Strategy, StrategyStatus};
use crate::models::trade::{Trade, TradeStatus, TradeType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Seed dates are compile-time constants; fall back to the epoch default
    // rather than panicking if one were ever mistyped.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Two seeded accumulation plans; capitals sum to 12847.50.
#[must_use]
pub fn sample_strategies() -> Vec<Strategy> {
    vec![
        Strategy {
            id: Some(1),
            user_id: None,
            name: "Conservative Growth".to_string(),
            duration: 3,
            pac: 500.0,
            frequency: Frequency::Monthly,
            custom_days: None,
            current_capital: 8500.0,
            performance: 12.5,
            status: StrategyStatus::Active,
            target: 0.10,
            reinvest: true,
            created_at: Some(date(2024, 1, 15)),
        },
        Strategy {
            id: Some(2),
            user_id: None,
            name: "Aggressive 15Y".to_string(),
            duration: 15,
            pac: 1000.0,
            frequency: Frequency::Weekly,
            custom_days: None,
            current_capital: 4347.50,
            performance: 15.2,
            status: StrategyStatus::Active,
            target: 0.25,
            reinvest: true,
            created_at: Some(date(2024, 6, 20)),
        },
    ]
}

/// Two seeded journal entries, one per sample strategy.
#[must_use]
pub fn sample_trades() -> Vec<Trade> {
    vec![
        Trade {
            id: Some(101),
            user_id: None,
            date: date(2025, 11, 21),
            strategy_id: 1,
            trade_type: TradeType::SellPut,
            strike: 95000.0,
            size: 0.1,
            premium: 11.40,
            btc_price: 97450.0,
            status: TradeStatus::Open,
            is_warranty_triggered: false,
            bonus_amount: None,
            notes: Some("Standard entry".to_string()),
        },
        Trade {
            id: Some(102),
            user_id: None,
            date: date(2025, 11, 20),
            strategy_id: 2,
            trade_type: TradeType::SellPut,
            strike: 94500.0,
            size: 0.05,
            premium: 15.20,
            btc_price: 96800.0,
            status: TradeStatus::Expired,
            is_warranty_triggered: false,
            bonus_amount: None,
            notes: None,
        },
    ]
}
