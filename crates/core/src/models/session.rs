use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live remote identity, as issued by the gateway's auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,

    #[serde(default)]
    pub email: Option<String>,

    /// Full name from the user's profile metadata, when present.
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Session {
    /// Name to greet the user with: full name, then email local part,
    /// then a generic fallback.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.full_name {
            if !name.trim().is_empty() {
                return name.clone();
            }
        }
        if let Some(email) = &self.email {
            if let Some(local) = email.split('@').next() {
                if !local.is_empty() {
                    return local.to_string();
                }
            }
        }
        "Trader".to_string()
    }
}

/// Which data source is currently authoritative.
///
/// `Authenticated` and `Guest` are mutually exclusive: at most one of them
/// holds at any time, and leaving `Guest` for `Authenticated` requires an
/// explicit sign-in that supersedes the persisted guest flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Session retrieval failed outright at startup; nothing was loaded.
    ConnectionError,
    /// No remote session and no guest flag; show sign-in, load nothing.
    Unauthenticated,
    /// Local-only mode over seeded sample data. No remote identity.
    Guest,
    /// Live remote session; the gateway is the authoritative source.
    Authenticated(Session),
}

impl SessionState {
    #[must_use]
    pub fn is_guest(&self) -> bool {
        matches!(self, SessionState::Guest)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// The remote session, when there is one.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Display name for the current mode ("Guest Trader" in guest mode).
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            SessionState::Guest => "Guest Trader".to_string(),
            SessionState::Authenticated(session) => session.display_name(),
            _ => "Trader".to_string(),
        }
    }
}

/// An asynchronous auth-state change pushed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    /// Token refresh; the identity is unchanged but re-issued.
    Refreshed(Session),
    SignedOut,
}
