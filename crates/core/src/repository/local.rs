use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use super::traits::EntityRepository;
use crate::errors::CoreError;
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;
use crate::seed;

/// Default artificial fetch delay, matching the perceived latency of the
/// remote path so guest mode does not feel suspiciously instant.
pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(600);

/// First id handed out to guest-created entities; seed ids stay below it.
const FIRST_LOCAL_ID: i64 = 1000;

/// Guest-mode repository: seeded, in-memory, no durable backing store.
///
/// Every mutation succeeds by definition — there is nothing durable to
/// fail against. Fetches pause for an artificial delay; mutations do not
/// suspend at all.
pub struct LocalRepository {
    strategies: Mutex<Vec<Strategy>>,
    trades: Mutex<Vec<Trade>>,
    next_id: AtomicI64,
    load_delay: Duration,
}

impl LocalRepository {
    /// Repository pre-populated with the guest sample data.
    #[must_use]
    pub fn with_sample_data(load_delay: Duration) -> Self {
        Self {
            strategies: Mutex::new(seed::sample_strategies()),
            trades: Mutex::new(seed::sample_trades()),
            next_id: AtomicI64::new(FIRST_LOCAL_ID),
            load_delay,
        }
    }

    /// Empty repository (tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: Mutex::new(Vec::new()),
            trades: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(FIRST_LOCAL_ID),
            load_delay: Duration::ZERO,
        }
    }

    /// Synthesize the once-only local id for an entity created in guest
    /// mode. Drafts that already carry an id keep it.
    fn assign_id(&self, existing: Option<i64>) -> i64 {
        existing.unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn simulate_latency(&self) {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::with_sample_data(DEFAULT_LOAD_DELAY)
    }
}

#[async_trait]
impl EntityRepository for LocalRepository {
    async fn fetch_strategies(&self) -> Result<Vec<Strategy>, CoreError> {
        self.simulate_latency().await;
        let strategies = self.strategies.lock().unwrap_or_else(|e| e.into_inner());
        Ok(strategies.clone())
    }

    async fn fetch_trades(&self) -> Result<Vec<Trade>, CoreError> {
        self.simulate_latency().await;
        let trades = self.trades.lock().unwrap_or_else(|e| e.into_inner());
        Ok(trades.clone())
    }

    async fn create_strategy(&self, draft: &Strategy) -> Result<Strategy, CoreError> {
        let mut stored = draft.clone();
        stored.id = Some(self.assign_id(stored.id));
        debug!(id = ?stored.id, "guest strategy created");
        let mut strategies = self.strategies.lock().unwrap_or_else(|e| e.into_inner());
        strategies.insert(0, stored.clone());
        Ok(stored)
    }

    async fn create_trade(&self, draft: &Trade) -> Result<Trade, CoreError> {
        let mut stored = draft.clone();
        stored.id = Some(self.assign_id(stored.id));
        debug!(id = ?stored.id, "guest trade created");
        let mut trades = self.trades.lock().unwrap_or_else(|e| e.into_inner());
        trades.insert(0, stored.clone());
        Ok(stored)
    }

    async fn update_trade(&self, trade: &Trade) -> Result<Trade, CoreError> {
        let mut trades = self.trades.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = trades.iter_mut().find(|t| t.id == trade.id) {
            *slot = trade.clone();
        }
        // Unknown ids are a no-op echo: guest mutations never fail.
        Ok(trade.clone())
    }

    async fn delete_trade(&self, id: i64) -> Result<(), CoreError> {
        let mut trades = self.trades.lock().unwrap_or_else(|e| e.into_inner());
        trades.retain(|t| t.id != Some(id));
        Ok(())
    }
}
