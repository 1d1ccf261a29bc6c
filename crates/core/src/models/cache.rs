use super::strategy::Strategy;
use super::trade::Trade;

/// Local mirror of the authoritative entity collections.
///
/// Both sequences are kept newest-first (display convention): loads replace
/// them wholesale in the order the source returned, creates prepend.
/// The cache is populated on load, cleared on sign-out, and replaced
/// wholesale on every mode switch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataCache {
    pub strategies: Vec<Strategy>,
    pub trades: Vec<Trade>,
}

impl DataCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty() && self.trades.is_empty()
    }
}
