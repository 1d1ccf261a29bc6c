use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;

/// Source-agnostic access to the entity collections.
///
/// The mode resolver installs exactly one implementation at a time:
/// [`super::local::LocalRepository`] for guest mode (in-memory, never
/// fails) or [`super::remote::RemoteRepository`] for authenticated mode
/// (every call round-trips through the gateway). Call sites never branch
/// on the mode.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn fetch_strategies(&self) -> Result<Vec<Strategy>, CoreError>;

    async fn fetch_trades(&self) -> Result<Vec<Trade>, CoreError>;

    /// Persist a draft and return the stored entity with its assigned id.
    async fn create_strategy(&self, draft: &Strategy) -> Result<Strategy, CoreError>;

    async fn create_trade(&self, draft: &Trade) -> Result<Trade, CoreError>;

    async fn update_trade(&self, trade: &Trade) -> Result<Trade, CoreError>;

    async fn delete_trade(&self, id: i64) -> Result<(), CoreError>;
}
