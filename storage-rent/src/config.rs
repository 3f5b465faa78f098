use {
    crate::node::OperationType,
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
};

/// The deployable storage-rent parameter set.
///
/// These are protocol constants, not algorithm shape: a network upgrade can
/// retune them without touching the rent arithmetic, and tests exercise the
/// formulas against several parameter sets. All charges are expressed in gas
/// units, all times in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RentConfig {
    /// Maximum gas a single node can be charged in one settlement.
    /// Bounds the worst-case one-shot cost of touching a large node that
    /// has been accruing for a long time.
    pub rent_cap: u64,

    /// Divisor of the linear accrual formula
    /// `rent_due = node_size × duration_ms / rent_rate_divisor`.
    /// Larger values make storage cheaper. Must be non-zero.
    pub rent_rate_divisor: u64,

    /// Accrued rent at or below this amount is waived for read operations.
    /// Keeps negligible charges out of gas estimation noise.
    pub read_threshold: u64,

    /// Waiver threshold for write and delete operations. Writes already pay
    /// for their trie update, so their rent threshold is lower.
    pub write_threshold: u64,

    /// Percentage (0-100) of the unthresholded rent charged as a rollback
    /// fee when a touch belongs to a reverted frame.
    pub rollback_fee_percent: u64,
}

impl RentConfig {
    /// The waiver threshold that applies to `operation`.
    #[inline]
    pub fn threshold(&self, operation: OperationType) -> u64 {
        if operation.is_write() {
            self.write_threshold
        } else {
            self.read_threshold
        }
    }
}

impl Default for RentConfig {
    /// Mainnet genesis parameters.
    fn default() -> Self {
        Self {
            rent_cap: 5_000,             // one node never costs more than 5 000 gas per settlement
            rent_rate_divisor: 1 << 21,  // ~1 gas per 2 MB·ms
            read_threshold: 2_500,
            write_threshold: 1_000,
            rollback_fee_percent: 25,
        }
    }
}
