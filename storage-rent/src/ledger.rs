//! Per-transaction rent aggregation.
//!
//! The executor owns one [`RentLedger`] per transaction, filling it as the
//! virtual machine resolves trie keys. Touches made by internal frames that
//! later revert are kept apart from surviving touches: at finalization the
//! surviving set pays normal rent and drives the timestamp write-backs,
//! while the reverted set pays rollback fees.
//!
//! All iteration is insertion-ordered (`IndexMap`), so charge totals sum in
//! a fixed order on every platform.

use {
    crate::{
        config::RentConfig,
        error::RentError,
        node::{RentKey, RentedNode},
    },
    indexmap::IndexMap,
    log::{debug, trace},
};

/// The outputs of settling one transaction's rent.
///
/// The executor deducts `paid_rent` from the transaction's remaining gas
/// (failing the transaction itself if gas runs out) and hands
/// `timestamp_updates` to the storage engine to persist atomically with the
/// transaction's other writes. On a whole-transaction revert the caller
/// discards the updates and charges `rollback_fee` alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RentSettlement {
    /// Sum of per-node payable rent over the surviving touches, in gas.
    pub payable_rent: u64,
    /// Sum of rollback fees over touches from reverted frames, in gas.
    pub rollback_fee: u64,
    /// Total gas to deduct: `payable_rent + rollback_fee`.
    pub paid_rent: u64,
    /// New rent timestamp per touched key, in touch order. Keys whose
    /// timestamp would not move are omitted.
    pub timestamp_updates: Vec<(RentKey, u64)>,
}

/// The set of trie nodes touched during one transaction.
///
/// Entries are deduplicated with set semantics over the full
/// (key, operation, size, timestamp) tuple: the same observation twice is
/// counted once, but re-touching a key under different observed facts adds
/// a second entry that accrues its own rent.
#[derive(Debug, Clone, Default)]
pub struct RentLedger {
    /// Touches from execution paths that survived.
    tracked: IndexMap<RentKey, Vec<RentedNode>>,
    /// Touches from internal frames that reverted.
    rolled_back: IndexMap<RentKey, Vec<RentedNode>>,
}

impl RentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touch on the surviving execution path.
    pub fn track(&mut self, node: RentedNode) {
        Self::insert(&mut self.tracked, node);
    }

    /// Record a touch made by a frame that has reverted.
    pub fn track_rollback(&mut self, node: RentedNode) {
        Self::insert(&mut self.rolled_back, node);
    }

    fn insert(map: &mut IndexMap<RentKey, Vec<RentedNode>>, node: RentedNode) {
        let entries = map.entry(node.key().clone()).or_default();
        if !entries.contains(&node) {
            entries.push(node);
        }
    }

    /// Merge a committed child frame's ledger into this one.
    pub fn absorb_committed(&mut self, child: RentLedger) {
        trace!(
            "absorbing committed frame: {} tracked, {} rolled-back keys",
            child.tracked.len(),
            child.rolled_back.len()
        );
        for (_, nodes) in child.tracked {
            for node in nodes {
                self.track(node);
            }
        }
        for (_, nodes) in child.rolled_back {
            for node in nodes {
                self.track_rollback(node);
            }
        }
    }

    /// Merge a reverted child frame's ledger into this one. Everything the
    /// child touched, including its own nested rollbacks, becomes a
    /// rollback touch here.
    pub fn absorb_rolled_back(&mut self, child: RentLedger) {
        trace!(
            "absorbing reverted frame: {} tracked, {} rolled-back keys",
            child.tracked.len(),
            child.rolled_back.len()
        );
        for (_, nodes) in child.tracked.into_iter().chain(child.rolled_back) {
            for node in nodes {
                self.track_rollback(node);
            }
        }
    }

    /// Total rent the transaction owes for its surviving touches.
    pub fn payable_rent(
        &self,
        config: &RentConfig,
        block_timestamp: u64,
    ) -> Result<u64, RentError> {
        let mut total: u64 = 0;
        for node in self.tracked_nodes() {
            total = total.saturating_add(node.payable_rent(config, block_timestamp)?);
        }
        Ok(total)
    }

    /// Total rollback fee owed for touches from reverted frames.
    ///
    /// Each reverted touch is checked against the surviving set: a key that
    /// is already paying positive rent through the normal path is not
    /// charged again.
    pub fn rollback_fee(
        &self,
        config: &RentConfig,
        block_timestamp: u64,
    ) -> Result<u64, RentError> {
        let mut total: u64 = 0;
        for node in self.rolled_back_nodes() {
            let fee = node.rollback_fee(config, block_timestamp, self.tracked_nodes())?;
            total = total.saturating_add(fee);
        }
        Ok(total)
    }

    /// The rent-timestamp write-backs for the surviving touches, one per
    /// distinct key in touch order.
    ///
    /// When a key was touched several times, the winning entry is the most
    /// recent write, or the most recent touch if the key was only read:
    /// writes dominate reads, later observations supersede earlier ones.
    /// Keys whose timestamp would not move (nothing was charged) are
    /// omitted so storage does no dead writes.
    pub fn timestamp_updates(
        &self,
        config: &RentConfig,
        block_timestamp: u64,
    ) -> Result<Vec<(RentKey, u64)>, RentError> {
        let mut updates = Vec::with_capacity(self.tracked.len());
        for (key, entries) in &self.tracked {
            let Some(winner) = Self::winning_entry(entries) else {
                continue;
            };
            let updated = winner.updated_rent_timestamp(config, block_timestamp)?;
            if winner.rent_timestamp() != Some(updated) {
                updates.push((key.clone(), updated));
            }
        }
        Ok(updates)
    }

    fn winning_entry(entries: &[RentedNode]) -> Option<&RentedNode> {
        let mut winner: Option<&RentedNode> = None;
        for entry in entries {
            match winner {
                Some(current) if current.operation().is_write() && !entry.operation().is_write() => {}
                _ => winner = Some(entry),
            }
        }
        winner
    }

    /// Settle the transaction: compute both charges and the timestamp
    /// write-backs in one pass over the ledger.
    pub fn settle(
        &self,
        config: &RentConfig,
        block_timestamp: u64,
    ) -> Result<RentSettlement, RentError> {
        let payable_rent = self.payable_rent(config, block_timestamp)?;
        let rollback_fee = self.rollback_fee(config, block_timestamp)?;
        let timestamp_updates = self.timestamp_updates(config, block_timestamp)?;
        let paid_rent = payable_rent.saturating_add(rollback_fee);

        debug!(
            "storage rent settled: {paid_rent} gas ({payable_rent} rent + {rollback_fee} rollback), \
             {} keys tracked, {} rolled back, {} timestamp updates",
            self.tracked.len(),
            self.rolled_back.len(),
            timestamp_updates.len(),
        );

        Ok(RentSettlement {
            payable_rent,
            rollback_fee,
            paid_rent,
            timestamp_updates,
        })
    }

    /// All surviving touches, in touch order.
    pub fn tracked_nodes(&self) -> impl Iterator<Item = &RentedNode> {
        self.tracked.values().flatten()
    }

    /// All reverted-frame touches, in touch order.
    pub fn rolled_back_nodes(&self) -> impl Iterator<Item = &RentedNode> {
        self.rolled_back.values().flatten()
    }

    pub fn contains_tracked_key(&self, key: &RentKey) -> bool {
        self.tracked.contains_key(key)
    }

    /// Number of distinct keys on the surviving path.
    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    /// Number of distinct keys touched by reverted frames.
    pub fn rolled_back_len(&self) -> usize {
        self.rolled_back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty() && self.rolled_back.is_empty()
    }
}
