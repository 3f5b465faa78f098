use thiserror::Error;

/// Errors produced by the storage-rent subsystem.
///
/// Every variant is a hard failure: rent charging is consensus-critical, so
/// a computation that cannot be carried out exactly must reject the enclosing
/// transaction rather than produce an approximate result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RentError {
    /// A node's stored rent timestamp is ahead of the executing block's
    /// timestamp. Block timestamps must be monotonic relative to stored
    /// rent timestamps, so this signals corrupted state or a clock
    /// inconsistency between the executor and the storage layer.
    #[error(
        "timestamp ordering violation: stored rent timestamp {rent_timestamp} \
         is ahead of block timestamp {block_timestamp}"
    )]
    TimestampOrdering {
        rent_timestamp: u64,
        block_timestamp: u64,
    },

    /// The rent parameter set is invalid (e.g. zero rate divisor,
    /// rollback percentage above 100).
    #[error("invalid rent configuration: {reason}")]
    InvalidConfig { reason: String },
}
