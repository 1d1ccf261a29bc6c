use thiserror::Error;

/// Unified error type for the entire wheel-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Network / Remote ────────────────────────────────────────────
    #[error("Network error: {0}")]
    Transport(String),

    /// Structured rejection from the remote store. `code` carries the
    /// backend's error code when one was returned (e.g. "42P01" for a
    /// missing relation); the schema classifier inspects both fields.
    #[error("Remote store error: {message}")]
    Gateway {
        code: Option<String>,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ── Local storage ───────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// Backend error code, when the failure carried one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            CoreError::Gateway { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // API key leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Transport(sanitized)
    }
}
