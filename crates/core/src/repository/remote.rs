use async_trait::async_trait;
use std::sync::Arc;

use super::traits::EntityRepository;
use crate::errors::CoreError;
use crate::gateway::traits::RemoteGateway;
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;

/// Authenticated-mode repository: every call round-trips through the
/// gateway, so local state only ever reflects what the remote store
/// actually accepted.
pub struct RemoteRepository {
    gateway: Arc<dyn RemoteGateway>,
}

impl RemoteRepository {
    #[must_use]
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl EntityRepository for RemoteRepository {
    async fn fetch_strategies(&self) -> Result<Vec<Strategy>, CoreError> {
        self.gateway.fetch_strategies().await
    }

    async fn fetch_trades(&self) -> Result<Vec<Trade>, CoreError> {
        self.gateway.fetch_trades().await
    }

    async fn create_strategy(&self, draft: &Strategy) -> Result<Strategy, CoreError> {
        self.gateway.create_strategy(draft).await
    }

    async fn create_trade(&self, draft: &Trade) -> Result<Trade, CoreError> {
        self.gateway.create_trade(draft).await
    }

    async fn update_trade(&self, trade: &Trade) -> Result<Trade, CoreError> {
        self.gateway.update_trade(trade).await
    }

    async fn delete_trade(&self, id: i64) -> Result<(), CoreError> {
        self.gateway.delete_trade(id).await
    }
}
