use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often the periodic contribution (PAC) is paid into the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "bi-weekly")]
    BiWeekly,
    #[serde(rename = "monthly")]
    Monthly,
    /// Custom interval; the strategy carries the interval in `custom_days`.
    #[serde(rename = "custom")]
    Custom,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::BiWeekly => write!(f, "bi-weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Custom => write!(f, "custom"),
        }
    }
}

/// Whether the accumulation plan is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Active,
    Paused,
}

/// A capital-accumulation plan that wheel trades are booked against.
///
/// Wire field names match the remote `strategies` table exactly, so the
/// same struct serves as gateway request/response body and cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Assigned exactly once — by the gateway on create, or synthesized
    /// locally in guest mode. Never changes afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Owning user. Absent in guest mode (no ownership concept there).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,

    pub name: String,

    /// Plan duration in years.
    pub duration: u32,

    /// Periodic contribution amount.
    pub pac: f64,

    pub frequency: Frequency,

    /// Interval in days when `frequency` is `Custom`.
    #[serde(
        rename = "customDays",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_days: Option<u32>,

    #[serde(rename = "currentCapital")]
    pub current_capital: f64,

    /// Performance since inception, in percent.
    pub performance: f64,

    pub status: StrategyStatus,

    /// Target premium ratio per cycle.
    pub target: f64,

    /// Whether collected premiums are reinvested into the plan.
    pub reinvest: bool,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,
}
