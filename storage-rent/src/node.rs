//! Touched-node snapshots.
//!
//! The transaction executor creates one [`RentedNode`] per trie resolution,
//! capturing the key, how it was touched, and the two storage-reported
//! facts that rent depends on: payload size and last rent-payment
//! timestamp. Snapshots are immutable; only the derived updated timestamp
//! ever flows back to storage.

use {
    crate::{config::RentConfig, error::RentError, policy},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// An opaque trie path, compared by value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RentKey(Vec<u8>);

impl RentKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for RentKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for RentKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for RentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for RentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RentKey({})", hex::encode(&self.0))
    }
}

/// How a trie node was touched during execution.
///
/// The operation type selects the waiver threshold and decides merge
/// dominance inside the ledger: a write to a key outranks any number of
/// reads of it. `Delete` is a write for both purposes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub enum OperationType {
    ReadAccount,
    ReadStorageCell,
    ReadCode,
    WriteAccount,
    WriteStorageCell,
    WriteCode,
    Delete,
}

impl OperationType {
    /// Writes (and deletes) mutate the trie; reads do not.
    #[inline]
    pub fn is_write(self) -> bool {
        matches!(
            self,
            OperationType::WriteAccount
                | OperationType::WriteStorageCell
                | OperationType::WriteCode
                | OperationType::Delete
        )
    }
}

/// One touched trie node within a single transaction.
///
/// Equality and hashing cover the full 4-tuple: two touches of the same key
/// observing different sizes or timestamps are distinct snapshots, and the
/// ledger keeps both (they each accrued rent under different facts).
///
/// `rent_timestamp == None` means the node has never been rented: it is new,
/// or predates rent activation. Such nodes owe nothing yet and have their
/// clock started at the current block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RentedNode {
    key: RentKey,
    operation: OperationType,
    node_size: u64,
    rent_timestamp: Option<u64>,
}

impl RentedNode {
    pub fn new(
        key: RentKey,
        operation: OperationType,
        node_size: u64,
        rent_timestamp: Option<u64>,
    ) -> Self {
        Self {
            key,
            operation,
            node_size,
            rent_timestamp,
        }
    }

    pub fn key(&self) -> &RentKey {
        &self.key
    }

    pub fn operation(&self) -> OperationType {
        self.operation
    }

    pub fn node_size(&self) -> u64 {
        self.node_size
    }

    pub fn rent_timestamp(&self) -> Option<u64> {
        self.rent_timestamp
    }

    /// Accrued rent for this node at `block_timestamp`, before cap and
    /// threshold are applied.
    fn rent_due(&self, config: &RentConfig, block_timestamp: u64) -> Result<u64, RentError> {
        let elapsed = policy::duration(self.rent_timestamp, block_timestamp)?;
        Ok(policy::rent_due(
            self.node_size,
            elapsed,
            config.rent_rate_divisor,
        ))
    }

    /// The gas this node's owning transaction must pay for it: accrued rent
    /// gated by the operation's threshold and bounded by the cap.
    pub fn payable_rent(
        &self,
        config: &RentConfig,
        block_timestamp: u64,
    ) -> Result<u64, RentError> {
        let due = self.rent_due(config, block_timestamp)?;
        Ok(policy::payable_rent(
            due,
            config.rent_cap,
            config.threshold(self.operation),
        ))
    }

    /// The rent timestamp to persist for this node's key after settlement.
    pub fn updated_rent_timestamp(
        &self,
        config: &RentConfig,
        block_timestamp: u64,
    ) -> Result<u64, RentError> {
        let due = self.rent_due(config, block_timestamp)?;
        policy::new_timestamp(
            due,
            self.rent_timestamp,
            block_timestamp,
            config.rent_cap,
            config.threshold(self.operation),
        )
    }

    /// The punitive fee for this node when its touch belongs to a reverted
    /// frame.
    ///
    /// The base is the capped rent with the threshold forced to zero:
    /// rollbacks deliberately bypass the small-amount waiver, because the
    /// point is deterrence of rent-free speculative touches, not billing
    /// efficiency. The fee is waived only when `paying_nodes` (the nodes
    /// settling normal rent alongside this rollback, compared by key)
    /// already charges this key a positive amount, so nothing is billed
    /// twice.
    pub fn rollback_fee<'a>(
        &self,
        config: &RentConfig,
        block_timestamp: u64,
        paying_nodes: impl IntoIterator<Item = &'a RentedNode>,
    ) -> Result<u64, RentError> {
        let due = self.rent_due(config, block_timestamp)?;
        let computed_rent = policy::payable_rent(due, config.rent_cap, 0);

        let already_paying = paying_nodes.into_iter().any(|node| node.key == self.key);
        if already_paying && self.payable_rent(config, block_timestamp)? > 0 {
            return Ok(0);
        }

        Ok(policy::fee_by_rent(
            computed_rent,
            config.rollback_fee_percent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &[u8]) -> RentKey {
        RentKey::from(raw)
    }

    #[test]
    fn test_key_display_is_hex() {
        let k = key(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(format!("{k}"), "deadbeef");
        assert_eq!(format!("{k:?}"), "RentKey(deadbeef)");
    }

    #[test]
    fn test_operation_write_classification() {
        assert!(OperationType::WriteAccount.is_write());
        assert!(OperationType::WriteStorageCell.is_write());
        assert!(OperationType::WriteCode.is_write());
        assert!(OperationType::Delete.is_write());
        assert!(!OperationType::ReadAccount.is_write());
        assert!(!OperationType::ReadStorageCell.is_write());
        assert!(!OperationType::ReadCode.is_write());
    }

    #[test]
    fn test_equality_covers_all_four_fields() {
        let a = RentedNode::new(key(b"k"), OperationType::ReadAccount, 100, Some(1_000));
        let same = RentedNode::new(key(b"k"), OperationType::ReadAccount, 100, Some(1_000));
        assert_eq!(a, same);

        let other_key = RentedNode::new(key(b"x"), OperationType::ReadAccount, 100, Some(1_000));
        let other_op = RentedNode::new(key(b"k"), OperationType::WriteAccount, 100, Some(1_000));
        let other_size = RentedNode::new(key(b"k"), OperationType::ReadAccount, 101, Some(1_000));
        let other_ts = RentedNode::new(key(b"k"), OperationType::ReadAccount, 100, Some(1_001));
        assert_ne!(a, other_key);
        assert_ne!(a, other_op);
        assert_ne!(a, other_size);
        assert_ne!(a, other_ts);
    }

    #[test]
    fn test_never_rented_node_pays_nothing_and_starts_clock() {
        let config = RentConfig::default();
        let node = RentedNode::new(key(b"new"), OperationType::WriteAccount, 4_096, None);
        assert_eq!(node.payable_rent(&config, 7_000).unwrap(), 0);
        assert_eq!(node.updated_rent_timestamp(&config, 7_000).unwrap(), 7_000);
    }

    #[test]
    fn test_timestamp_ordering_violation_propagates() {
        let config = RentConfig::default();
        let node = RentedNode::new(key(b"k"), OperationType::ReadAccount, 100, Some(9_000));
        assert!(matches!(
            node.payable_rent(&config, 8_000),
            Err(RentError::TimestampOrdering { .. })
        ));
        assert!(matches!(
            node.updated_rent_timestamp(&config, 8_000),
            Err(RentError::TimestampOrdering { .. })
        ));
        assert!(matches!(
            node.rollback_fee(&config, 8_000, std::iter::empty::<&RentedNode>()),
            Err(RentError::TimestampOrdering { .. })
        ));
    }
}
