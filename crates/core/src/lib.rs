pub mod errors;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use errors::CoreError;
use gateway::traits::RemoteGateway;
use models::cache::DataCache;
use models::notice::{Notice, SignOutOutcome};
use models::session::{SessionEvent, SessionState};
use models::strategy::Strategy;
use models::trade::Trade;
use repository::local::{LocalRepository, DEFAULT_LOAD_DELAY};
use repository::remote::RemoteRepository;
use repository::traits::EntityRepository;
use services::schema_service::{SchemaService, SetupGuidance};
use services::session_service::SessionService;
use services::sync_service::SyncService;
use storage::prefs::PrefsStore;

/// Main entry point for the Wheel Tracker core library.
///
/// Owns the resolved session state, the local entity cache, and the
/// repository currently treated as authoritative. The presentation layer
/// reads the cache through the accessors and issues mutation intents
/// through the async methods; it never talks to the gateway directly.
///
/// Mutation policy: guest-mode mutations are local and unconditional,
/// authenticated-mode mutations touch the cache only after the gateway
/// acknowledged them. The cache is the only mirror of durable truth and
/// must never show state the backing store did not accept.
#[must_use]
pub struct WheelTracker {
    gateway: Arc<dyn RemoteGateway>,
    prefs: Arc<dyn PrefsStore>,
    state: SessionState,
    /// Authoritative source for the current mode; `None` while no data
    /// source applies (Unauthenticated, ConnectionError).
    repo: Option<Arc<dyn EntityRepository>>,
    cache: DataCache,
    selected_strategy: Option<i64>,
    setup: SetupGuidance,
    notices: Vec<Notice>,
    loading: bool,
    /// Bumped on every mode switch; in-flight results from a superseded
    /// session compare against it and are discarded instead of applied.
    epoch: u64,
    guest_load_delay: Duration,
}

impl std::fmt::Debug for WheelTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelTracker")
            .field("state", &self.state)
            .field("strategies", &self.cache.strategies.len())
            .field("trades", &self.cache.trades.len())
            .field("loading", &self.loading)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl WheelTracker {
    pub fn new(gateway: Arc<dyn RemoteGateway>, prefs: Arc<dyn PrefsStore>) -> Self {
        Self {
            gateway,
            prefs,
            state: SessionState::Unauthenticated,
            repo: None,
            cache: DataCache::new(),
            selected_strategy: None,
            setup: SetupGuidance::new(),
            notices: Vec::new(),
            loading: false,
            epoch: 0,
            guest_load_delay: DEFAULT_LOAD_DELAY,
        }
    }

    /// Override the artificial guest-mode load delay (tests use zero).
    pub fn with_guest_load_delay(mut self, delay: Duration) -> Self {
        self.guest_load_delay = delay;
        self
    }

    // ── Session lifecycle ───────────────────────────────────────────

    /// Startup resolution: retrieve the remote session, fall back to the
    /// persisted guest flag, and load data when a source is authoritative.
    /// Never loads in `ConnectionError` or `Unauthenticated`.
    pub async fn bootstrap(&mut self) -> &SessionState {
        self.loading = true;
        let state =
            SessionService::resolve_startup(self.gateway.as_ref(), self.prefs.as_ref()).await;
        self.transition(state).await;
        &self.state
    }

    /// Explicit sign-in. Supersedes an active guest session: the guest
    /// flag is cleared and in-progress guest data is discarded.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), CoreError> {
        let session = self.gateway.sign_in(email, password).await?;
        if self.prefs.guest_mode() {
            SessionService::exit_guest(self.prefs.as_ref())?;
        }
        self.transition(SessionState::Authenticated(session)).await;
        Ok(())
    }

    /// User-initiated guest opt-in from the sign-in screen. Persists the
    /// flag, installs the seeded local source, and loads it.
    pub async fn enter_guest_mode(&mut self) -> Result<(), CoreError> {
        if !matches!(self.state, SessionState::Unauthenticated) {
            warn!(state = ?self.state, "guest mode entry ignored outside sign-in");
            return Ok(());
        }
        SessionService::enter_guest(self.prefs.as_ref())?;
        self.transition(SessionState::Guest).await;
        Ok(())
    }

    /// Sign out of the current mode.
    ///
    /// Guest: clears the persisted flag and tells the shell to restart the
    /// process, so all in-memory state is discarded and the next startup
    /// resolves to `Unauthenticated`. Authenticated: gateway sign-out,
    /// session cleared in memory, no restart.
    pub async fn sign_out(&mut self) -> Result<SignOutOutcome, CoreError> {
        if self.state.is_guest() {
            SessionService::exit_guest(self.prefs.as_ref())?;
            self.reset(SessionState::Unauthenticated);
            return Ok(SignOutOutcome::RestartRequired);
        }
        self.gateway.sign_out().await?;
        self.reset(SessionState::Unauthenticated);
        Ok(SignOutOutcome::SignedOut)
    }

    /// Hand out the gateway's auth-event stream; the shell pumps it into
    /// [`Self::handle_session_event`]. Dropping the receiver unsubscribes.
    pub fn session_events(&self) -> UnboundedReceiver<SessionEvent> {
        self.gateway.subscribe()
    }

    /// React to an asynchronous remote auth-state change.
    ///
    /// Ignored entirely in guest mode: a user exploring guest mode is
    /// never silently bumped onto a stale remote session.
    pub async fn handle_session_event(&mut self, event: SessionEvent) {
        if self.state.is_guest() {
            debug!(?event, "session event suppressed in guest mode");
            return;
        }
        match event {
            SessionEvent::SignedIn(session) | SessionEvent::Refreshed(session) => {
                self.transition(SessionState::Authenticated(session)).await;
            }
            SessionEvent::SignedOut => {
                self.reset(SessionState::Unauthenticated);
            }
        }
    }

    // ── Data loading ────────────────────────────────────────────────

    /// (Re)load both entity collections from the authoritative source.
    ///
    /// The two fetches run concurrently and both caches are replaced
    /// wholesale on success. On failure the caches stay as they were
    /// (stale-but-present) and nothing is propagated: a schema error is
    /// recorded on the setup guidance, anything else only logs. The
    /// loading flag is cleared on every outcome; a result arriving after
    /// the session epoch advanced is discarded outright.
    pub async fn load_data(&mut self) {
        let Some(repo) = self.repo.clone() else {
            self.loading = false;
            return;
        };
        self.loading = true;
        let epoch = self.epoch;

        let result = tokio::try_join!(repo.fetch_strategies(), repo.fetch_trades());

        if epoch != self.epoch {
            // Superseded mid-flight: the result is discarded, but the
            // indicator this load armed still has to terminate. A load
            // started by the new mode re-arms it itself.
            debug!("discarding load result from superseded session");
            self.loading = false;
            return;
        }
        match result {
            Ok((strategies, trades)) => {
                debug!(
                    strategies = strategies.len(),
                    trades = trades.len(),
                    "load complete"
                );
                SyncService::replace_all(&mut self.cache, strategies, trades);
            }
            Err(error) => {
                if SchemaService::is_schema_error(&error) {
                    self.setup.record_failure(&error);
                } else {
                    warn!(%error, "load failed; keeping stale cache");
                }
            }
        }
        self.loading = false;
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Persist a new strategy and make it the selected context.
    ///
    /// Failures are terminal here: a schema error raises the setup
    /// guidance, anything else becomes a blocking alert. Either way the
    /// cache is untouched — there was no optimistic insert to roll back.
    pub async fn save_strategy(&mut self, draft: Strategy) {
        let Some(repo) = self.repo.clone() else {
            return;
        };
        let epoch = self.epoch;
        match repo.create_strategy(&draft).await {
            Ok(saved) => {
                if epoch != self.epoch {
                    return;
                }
                self.selected_strategy = saved.id;
                SyncService::prepend_strategy(&mut self.cache, saved);
            }
            Err(error) => {
                if SchemaService::is_schema_error(&error) {
                    self.setup.record_failure(&error);
                } else {
                    self.notices
                        .push(Notice::alert(format!("Failed to save strategy: {error}")));
                }
            }
        }
    }

    /// Persist a new trade; the acknowledged echo is prepended to the
    /// cache. Failures re-throw after classification so the caller can
    /// keep its editing form open.
    pub async fn add_trade(&mut self, draft: Trade) -> Result<(), CoreError> {
        let Some(repo) = self.repo.clone() else {
            return Ok(());
        };
        let epoch = self.epoch;
        match repo.create_trade(&draft).await {
            Ok(saved) => {
                if epoch == self.epoch {
                    SyncService::prepend_trade(&mut self.cache, saved);
                }
                Ok(())
            }
            Err(error) => {
                if SchemaService::is_schema_error(&error) {
                    self.setup.record_failure(&error);
                }
                Err(error)
            }
        }
    }

    /// Update an existing trade; same re-throw contract as [`Self::add_trade`].
    pub async fn update_trade(&mut self, trade: Trade) -> Result<(), CoreError> {
        let Some(repo) = self.repo.clone() else {
            return Ok(());
        };
        let epoch = self.epoch;
        match repo.update_trade(&trade).await {
            Ok(updated) => {
                if epoch == self.epoch {
                    SyncService::apply_trade_update(&mut self.cache, updated);
                }
                Ok(())
            }
            Err(error) => {
                if SchemaService::is_schema_error(&error) {
                    self.setup.record_failure(&error);
                }
                Err(error)
            }
        }
    }

    /// Delete a trade. Fire-and-forget from the caller's perspective:
    /// non-schema failures surface as a blocking alert, nothing re-throws.
    pub async fn delete_trade(&mut self, id: i64) {
        let Some(repo) = self.repo.clone() else {
            return;
        };
        let epoch = self.epoch;
        match repo.delete_trade(id).await {
            Ok(()) => {
                if epoch == self.epoch {
                    SyncService::remove_trade(&mut self.cache, id);
                }
            }
            Err(error) => {
                if SchemaService::is_schema_error(&error) {
                    self.setup.record_failure(&error);
                } else {
                    self.notices
                        .push(Notice::alert(format!("Failed to delete trade: {error}")));
                }
            }
        }
    }

    // ── Setup guidance ──────────────────────────────────────────────

    /// Hide the schema-remediation prompt for the rest of this process
    /// lifetime; later identical failures stay silent.
    pub fn dismiss_setup_guidance(&mut self) {
        self.setup.dismiss();
    }

    /// Show the remediation prompt on explicit user request (e.g. a
    /// "database reset" menu entry), optionally with a message override.
    pub fn force_setup_guidance(&mut self, message: Option<String>) {
        self.setup.force_show(message);
    }

    #[must_use]
    pub fn setup_guidance(&self) -> &SetupGuidance {
        &self.setup
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.cache.strategies
    }

    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.cache.trades
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Strategy currently selected as the dashboard context.
    #[must_use]
    pub fn selected_strategy(&self) -> Option<i64> {
        self.selected_strategy
    }

    pub fn select_strategy(&mut self, id: Option<i64>) {
        self.selected_strategy = id;
    }

    /// Drain queued alerts for the presentation layer to display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Switch modes: advance the epoch (invalidating in-flight results),
    /// swap the authoritative repository, replace the cache wholesale via
    /// a fresh load where the new mode has a data source.
    async fn transition(&mut self, state: SessionState) {
        self.epoch += 1;
        SyncService::clear(&mut self.cache);
        self.selected_strategy = None;
        self.state = state;
        self.repo = match &self.state {
            SessionState::Authenticated(_) => {
                let repo: Arc<dyn EntityRepository> =
                    Arc::new(RemoteRepository::new(self.gateway.clone()));
                Some(repo)
            }
            SessionState::Guest => {
                let repo: Arc<dyn EntityRepository> =
                    Arc::new(LocalRepository::with_sample_data(self.guest_load_delay));
                Some(repo)
            }
            SessionState::ConnectionError | SessionState::Unauthenticated => None,
        };
        self.load_data().await;
    }

    /// Drop all in-memory session state without loading anything.
    fn reset(&mut self, state: SessionState) {
        self.epoch += 1;
        SyncService::clear(&mut self.cache);
        self.selected_strategy = None;
        self.repo = None;
        self.loading = false;
        self.state = state;
    }
}
