use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::gateway::traits::RemoteGateway;
use crate::models::session::SessionState;
use crate::storage::prefs::PrefsStore;

/// Resolves which of {ConnectionError, Unauthenticated, Guest,
/// Authenticated} the process is in, at startup and whenever the remote
/// auth state changes.
///
/// Pure decision logic — no cache access. The facade installs the
/// matching repository and triggers loads from the resolved state.
pub struct SessionService;

impl SessionService {
    /// Startup resolution. Exactly one outcome:
    ///
    /// 1. Session retrieval fails outright → `ConnectionError`; the caller
    ///    must not attempt any data load.
    /// 2. A live session exists → `Authenticated`.
    /// 3. No session → `Guest` when the persisted flag is set, otherwise
    ///    `Unauthenticated`.
    pub async fn resolve_startup(
        gateway: &dyn RemoteGateway,
        prefs: &dyn PrefsStore,
    ) -> SessionState {
        match gateway.get_session().await {
            Err(error) => {
                warn!(%error, "session retrieval failed at startup");
                SessionState::ConnectionError
            }
            Ok(Some(session)) => {
                debug!(user = %session.user_id, "resumed remote session");
                SessionState::Authenticated(session)
            }
            Ok(None) => {
                if prefs.guest_mode() {
                    debug!("no remote session, guest flag set");
                    SessionState::Guest
                } else {
                    SessionState::Unauthenticated
                }
            }
        }
    }

    /// Persist the guest opt-in. Entering guest mode is always an explicit
    /// user action, never automatic.
    pub fn enter_guest(prefs: &dyn PrefsStore) -> Result<(), CoreError> {
        prefs.set_guest_mode(true)
    }

    /// Clear the guest flag on guest sign-out, so a subsequent startup
    /// resolves to `Unauthenticated` rather than `Guest`.
    pub fn exit_guest(prefs: &dyn PrefsStore) -> Result<(), CoreError> {
        prefs.set_guest_mode(false)
    }
}
