use crate::models::cache::DataCache;
use crate::models::strategy::Strategy;
use crate::models::trade::Trade;

/// Cache mutation primitives for the local entity mirror.
///
/// Pure in-memory logic — no I/O, no error paths. The facade decides
/// *when* these run (only after the source acknowledged the mutation, or
/// unconditionally in guest mode); this service only knows *how* the
/// mirror changes.
pub struct SyncService;

impl SyncService {
    /// Replace both collections wholesale with a freshly loaded snapshot.
    pub fn replace_all(cache: &mut DataCache, strategies: Vec<Strategy>, trades: Vec<Trade>) {
        cache.strategies = strategies;
        cache.trades = trades;
    }

    /// Drop everything (sign-out, mode switch).
    pub fn clear(cache: &mut DataCache) {
        cache.strategies.clear();
        cache.trades.clear();
    }

    /// Newest-first display convention: created entities go to the front.
    pub fn prepend_strategy(cache: &mut DataCache, strategy: Strategy) {
        cache.strategies.insert(0, strategy);
    }

    pub fn prepend_trade(cache: &mut DataCache, trade: Trade) {
        cache.trades.insert(0, trade);
    }

    /// Swap in the source-acknowledged version of an existing trade.
    /// A miss is a no-op: the mirror only ever reflects what the source
    /// confirmed, never an id it does not know.
    pub fn apply_trade_update(cache: &mut DataCache, updated: Trade) {
        if let Some(slot) = cache.trades.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn remove_trade(cache: &mut DataCache, id: i64) {
        cache.trades.retain(|t| t.id != Some(id));
    }
}
