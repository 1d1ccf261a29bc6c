use tracing::warn;

use crate::errors::CoreError;

/// Postgres: relation does not exist.
const CODE_UNDEFINED_TABLE: &str = "42P01";
/// Postgres: column does not exist.
const CODE_UNDEFINED_COLUMN: &str = "42703";

/// Heuristic detector for remote-schema problems (missing tables or
/// columns, stale schema cache).
///
/// Matches on the structured error code first, then on normalized message
/// text. A false negative degrades to the generic failure path; a false
/// positive only shows non-destructive setup guidance, so the rules err
/// on the loose side.
pub struct SchemaService;

impl SchemaService {
    #[must_use]
    pub fn is_schema_error(error: &CoreError) -> bool {
        if matches!(
            error.code(),
            Some(CODE_UNDEFINED_TABLE | CODE_UNDEFINED_COLUMN)
        ) {
            return true;
        }

        let msg = error.to_string().to_lowercase();
        if msg.contains("relation") && msg.contains("does not exist") {
            return true;
        }
        if msg.contains("column") && msg.contains("does not exist") {
            return true;
        }
        if msg.contains("schema cache") {
            return true;
        }
        false
    }
}

/// State of the schema-remediation prompt.
///
/// The prompt re-shows on every schema failure until the user dismisses it;
/// the dismissal is scoped to the current process lifetime and is not
/// persisted. A user-initiated request (`force_show`) bypasses the
/// dismissal, since it is an explicit ask.
#[derive(Debug, Default)]
pub struct SetupGuidance {
    visible: bool,
    dismissed: bool,
    last_error: Option<String>,
}

impl SetupGuidance {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a classified schema failure and surface the prompt unless
    /// it was dismissed earlier in this process lifetime.
    pub fn record_failure(&mut self, error: &CoreError) {
        warn!(%error, "schema error detected");
        self.last_error = Some(error.to_string());
        if !self.dismissed {
            self.visible = true;
        }
    }

    /// Hide the prompt and suppress automatic re-shows for the rest of
    /// this process lifetime.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.dismissed = true;
    }

    /// Show the prompt on explicit user request, optionally replacing the
    /// remembered failure message.
    pub fn force_show(&mut self, message: Option<String>) {
        if let Some(message) = message {
            self.last_error = Some(message);
        }
        self.visible = true;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
