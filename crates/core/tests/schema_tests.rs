// ═══════════════════════════════════════════════════════════════════
// Schema Classifier & Setup Guidance Tests — SchemaService rules,
// prompt visibility and dismissal lifecycle
// ═══════════════════════════════════════════════════════════════════

use wheel_tracker_core::errors::CoreError;
use wheel_tracker_core::services::schema_service::{SchemaService, SetupGuidance};

fn gateway_err(code: Option<&str>, message: &str) -> CoreError {
    CoreError::Gateway {
        code: code.map(str::to_string),
        message: message.to_string(),
    }
}

// ── Classifier rules ────────────────────────────────────────────────

#[test]
fn missing_relation_message_is_schema_error() {
    let err = gateway_err(None, r#"relation "trades" does not exist"#);
    assert!(SchemaService::is_schema_error(&err));
}

#[test]
fn missing_column_message_is_schema_error() {
    let err = gateway_err(
        None,
        r#"column "target" of relation "strategies" does not exist"#,
    );
    assert!(SchemaService::is_schema_error(&err));
}

#[test]
fn schema_cache_message_is_schema_error() {
    let err = gateway_err(
        None,
        "Could not find the 'reinvest' column of 'strategies' in the schema cache",
    );
    assert!(SchemaService::is_schema_error(&err));
}

#[test]
fn undefined_table_code_is_schema_error() {
    // Code match alone is enough, whatever the message says.
    let err = gateway_err(Some("42P01"), "something went wrong");
    assert!(SchemaService::is_schema_error(&err));
}

#[test]
fn undefined_column_code_is_schema_error() {
    let err = gateway_err(Some("42703"), "something went wrong");
    assert!(SchemaService::is_schema_error(&err));
}

#[test]
fn message_matching_is_case_insensitive() {
    let err = gateway_err(None, r#"Relation "trades" DOES NOT EXIST"#);
    assert!(SchemaService::is_schema_error(&err));
}

#[test]
fn auth_failure_is_not_schema_error() {
    let err = gateway_err(None, "Invalid login credentials");
    assert!(!SchemaService::is_schema_error(&err));
}

#[test]
fn transport_failure_is_not_schema_error() {
    let err = CoreError::Transport("connection refused".to_string());
    assert!(!SchemaService::is_schema_error(&err));
}

#[test]
fn relation_without_does_not_exist_is_not_schema_error() {
    // Both halves of the phrase are required.
    let err = gateway_err(None, "relation already locked");
    assert!(!SchemaService::is_schema_error(&err));
}

// ── Setup guidance lifecycle ────────────────────────────────────────

#[test]
fn recording_a_failure_shows_the_prompt() {
    let mut setup = SetupGuidance::new();
    assert!(!setup.is_visible());

    setup.record_failure(&gateway_err(None, r#"relation "trades" does not exist"#));
    assert!(setup.is_visible());
    assert!(setup.last_error().unwrap().contains("does not exist"));
}

#[test]
fn dismissal_suppresses_later_failures() {
    let mut setup = SetupGuidance::new();
    setup.record_failure(&gateway_err(Some("42P01"), "missing table"));
    assert!(setup.is_visible());

    setup.dismiss();
    assert!(!setup.is_visible());

    // An identical failure later in the same process stays silent,
    // though the message is still recorded.
    setup.record_failure(&gateway_err(Some("42P01"), "missing table"));
    assert!(!setup.is_visible());
    assert!(setup.last_error().is_some());
}

#[test]
fn force_show_bypasses_dismissal() {
    let mut setup = SetupGuidance::new();
    setup.dismiss();

    setup.force_show(Some("manual schema check".to_string()));
    assert!(setup.is_visible());
    assert_eq!(setup.last_error(), Some("manual schema check"));
}

#[test]
fn force_show_without_message_keeps_previous_error() {
    let mut setup = SetupGuidance::new();
    setup.record_failure(&gateway_err(Some("42703"), "missing column"));
    setup.dismiss();

    setup.force_show(None);
    assert!(setup.is_visible());
    assert!(setup.last_error().unwrap().contains("missing column"));
}
