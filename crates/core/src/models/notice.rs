/// A user-facing notification queued by the core for the presentation
/// layer to drain and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking alert carrying the raw failure message.
    Alert(String),
}

impl Notice {
    pub fn alert(message: impl Into<String>) -> Self {
        Notice::Alert(message.into())
    }
}

/// What the embedding shell must do after a sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutOutcome {
    /// Session cleared in memory; keep running on the sign-in screen.
    SignedOut,
    /// Guest exit: all in-memory state must be discarded by restarting
    /// the process so the unauthenticated path is re-entered cleanly.
    RestartRequired,
}
