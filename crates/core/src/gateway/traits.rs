use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::errors::CoreError;
use crate::models::session::{Session, SessionEvent};
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;

/// Trait abstraction over the managed backend (auth + entity store).
///
/// The backend is an opaque external service: any call may fail with a
/// transport error, and the CRUD calls may additionally fail with a
/// structured `Gateway` error when the remote schema rejects the request.
/// Tests substitute a scripted implementation; production uses
/// [`super::supabase::SupabaseGateway`].
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Retrieve the current session, if any. `Ok(None)` means "no session",
    /// which is distinct from a transport failure.
    async fn get_session(&self) -> Result<Option<Session>, CoreError>;

    /// Register for asynchronous auth-state changes (external sign-in or
    /// sign-out, token refresh). Dropping the receiver unsubscribes.
    fn subscribe(&self) -> UnboundedReceiver<SessionEvent>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, CoreError>;

    async fn sign_out(&self) -> Result<(), CoreError>;

    async fn fetch_strategies(&self) -> Result<Vec<Strategy>, CoreError>;

    async fn fetch_trades(&self) -> Result<Vec<Trade>, CoreError>;

    /// Persist a draft; the server assigns `id` and `user_id` and echoes
    /// the stored row back.
    async fn create_strategy(&self, draft: &Strategy) -> Result<Strategy, CoreError>;

    async fn create_trade(&self, draft: &Trade) -> Result<Trade, CoreError>;

    async fn update_trade(&self, trade: &Trade) -> Result<Trade, CoreError>;

    async fn delete_trade(&self, id: i64) -> Result<(), CoreError>;
}
