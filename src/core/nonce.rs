//! Local nonce tracking
//!
//! The tracker is seeded once from the node's transaction count and then
//! advanced locally, exactly once per transaction the node accepted.

/// Tracks the next nonce to use for an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceTracker {
    initial: u64,
    next: u64,
}

impl NonceTracker {
    /// Start from the on-chain transaction count
    pub fn new(on_chain_count: u64) -> Self {
        Self {
            initial: on_chain_count,
            next: on_chain_count,
        }
    }

    /// Nonce for the next transaction
    pub fn next(&self) -> u64 {
        self.next
    }

    /// Record that the node accepted a transaction with nonce `next()`
    pub fn advance(&mut self) {
        self.next += 1;
    }

    /// Transactions submitted since the tracker was seeded
    pub fn submitted(&self) -> u64 {
        self.next - self.initial
    }
}
