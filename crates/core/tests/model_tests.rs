// ═══════════════════════════════════════════════════════════════════
// Model Tests — wire-format fidelity (serde renames), display names,
// seed-data invariants
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use uuid::Uuid;

use wheel_tracker_core::models::session::{Session, SessionState};
use wheel_tracker_core::models::strategy::{Frequency, Strategy, StrategyStatus};
use wheel_tracker_core::models::trade::{Trade, TradeStatus, TradeType};
use wheel_tracker_core::seed;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Strategy wire format ────────────────────────────────────────────

#[test]
fn strategy_serializes_with_remote_column_names() {
    let strategy = Strategy {
        id: Some(7),
        user_id: None,
        name: "Custom Plan".to_string(),
        duration: 5,
        pac: 250.0,
        frequency: Frequency::Custom,
        custom_days: Some(10),
        current_capital: 1234.5,
        performance: 3.2,
        status: StrategyStatus::Paused,
        target: 0.15,
        reinvest: false,
        created_at: Some(date(2025, 2, 1)),
    };

    let json = serde_json::to_value(&strategy).unwrap();
    assert_eq!(json["customDays"], 10);
    assert_eq!(json["currentCapital"], 1234.5);
    assert_eq!(json["createdAt"], "2025-02-01");
    assert_eq!(json["frequency"], "custom");
    assert_eq!(json["status"], "paused");
    // Absent optionals are omitted entirely, not sent as null.
    assert!(json.get("user_id").is_none());
}

#[test]
fn strategy_deserializes_from_remote_row() {
    let row = serde_json::json!({
        "id": 42,
        "user_id": "7f9c24e8-3b1a-4ef5-9db4-9b9a5a0c8d6e",
        "name": "Conservative Growth",
        "duration": 3,
        "pac": 500.0,
        "frequency": "bi-weekly",
        "currentCapital": 8500.0,
        "performance": 12.5,
        "status": "active",
        "target": 0.10,
        "reinvest": true,
        "createdAt": "2024-01-15"
    });

    let strategy: Strategy = serde_json::from_value(row).unwrap();
    assert_eq!(strategy.id, Some(42));
    assert_eq!(strategy.frequency, Frequency::BiWeekly);
    assert_eq!(strategy.status, StrategyStatus::Active);
    assert_eq!(strategy.custom_days, None);
    assert_eq!(
        strategy.user_id,
        Some(Uuid::parse_str("7f9c24e8-3b1a-4ef5-9db4-9b9a5a0c8d6e").unwrap())
    );
}

// ── Trade wire format ───────────────────────────────────────────────

#[test]
fn trade_serializes_with_remote_column_names() {
    let trade = Trade {
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
        bonus_amount: Some(5.0),
        notes: None,
    };

    let json = serde_json::to_value(&trade).unwrap();
    assert_eq!(json["type"], "Sell Put");
    assert_eq!(json["strategyId"], 1);
    assert_eq!(json["btcPrice"], 97450.0);
    assert_eq!(json["isWarrantyTriggered"], false);
    assert_eq!(json["bonusAmount"], 5.0);
    assert_eq!(json["status"], "Open");
    assert!(json.get("notes").is_none());
}

#[test]
fn trade_deserializes_without_optional_fields() {
    let row = serde_json::json!({
        "date": "2025-11-20",
        "strategyId": 2,
        "type": "Sell Call",
        "strike": 94500.0,
        "size": 0.05,
        "premium": 15.20,
        "btcPrice": 96800.0,
        "status": "Assigned",
        "isWarrantyTriggered": true
    });

    let trade: Trade = serde_json::from_value(row).unwrap();
    assert_eq!(trade.id, None);
    assert_eq!(trade.trade_type, TradeType::SellCall);
    assert_eq!(trade.status, TradeStatus::Assigned);
    assert!(trade.is_warranty_triggered);
    assert_eq!(trade.bonus_amount, None);
    assert_eq!(trade.notes, None);
}

#[test]
fn enum_display_matches_wire_names() {
    assert_eq!(TradeType::SellPut.to_string(), "Sell Put");
    assert_eq!(TradeType::SellCall.to_string(), "Sell Call");
    assert_eq!(TradeStatus::Expired.to_string(), "Expired");
    assert_eq!(Frequency::BiWeekly.to_string(), "bi-weekly");
}

// ── Display names ───────────────────────────────────────────────────

#[test]
fn session_display_name_prefers_full_name() {
    let session = Session {
        user_id: Uuid::new_v4(),
        email: Some("anna@example.com".to_string()),
        full_name: Some("Anna Rossi".to_string()),
    };
    assert_eq!(session.display_name(), "Anna Rossi");
}

#[test]
fn session_display_name_falls_back_to_email_local_part() {
    let session = Session {
        user_id: Uuid::new_v4(),
        email: Some("anna@example.com".to_string()),
        full_name: None,
    };
    assert_eq!(session.display_name(), "anna");
}

#[test]
fn session_display_name_last_resort_is_trader() {
    let session = Session {
        user_id: Uuid::new_v4(),
        email: None,
        full_name: Some("   ".to_string()),
    };
    assert_eq!(session.display_name(), "Trader");
}

#[test]
fn guest_state_displays_guest_trader() {
    assert_eq!(SessionState::Guest.display_name(), "Guest Trader");
}

// ── Seed invariants ─────────────────────────────────────────────────

#[test]
fn seed_capitals_sum_to_expected_total() {
    let total: f64 = seed::sample_strategies()
        .iter()
        .map(|s| s.current_capital)
        .sum();
    assert!((total - 12847.50).abs() < 1e-9);
}

#[test]
fn seed_trades_reference_seeded_strategies() {
    let strategy_ids: Vec<i64> = seed::sample_strategies()
        .iter()
        .filter_map(|s| s.id)
        .collect();
    for trade in seed::sample_trades() {
        assert!(strategy_ids.contains(&trade.strategy_id));
        assert!(trade.id.is_some());
    }
}

#[test]
fn seed_has_no_owner_references() {
    // Guest mode has no ownership concept.
    assert!(seed::sample_strategies().iter().all(|s| s.user_id.is_none()));
    assert!(seed::sample_trades().iter().all(|t| t.user_id.is_none()));
}
