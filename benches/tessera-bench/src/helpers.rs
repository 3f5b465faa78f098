//! Shared helpers for Tessera benchmarks.

use {
    rand::{rngs::StdRng, Rng, SeedableRng},
    tessera_storage_rent::{OperationType, RentKey, RentLedger, RentedNode},
};

const OPERATIONS: [OperationType; 7] = [
    OperationType::ReadAccount,
    OperationType::ReadStorageCell,
    OperationType::ReadCode,
    OperationType::WriteAccount,
    OperationType::WriteStorageCell,
    OperationType::WriteCode,
    OperationType::Delete,
];

/// Deterministic RNG so runs are comparable across machines.
pub fn rng() -> StdRng {
    StdRng::seed_from_u64(0x7e55e7a)
}

/// A random 32-byte trie key.
pub fn random_key(rng: &mut StdRng) -> RentKey {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes[..]);
    RentKey::new(bytes.to_vec())
}

/// A random touched node observed somewhere before `block_timestamp`.
pub fn random_node(rng: &mut StdRng, block_timestamp: u64) -> RentedNode {
    let key = random_key(rng);
    let operation = OPERATIONS[rng.random_range(0..OPERATIONS.len())];
    let node_size = rng.random_range(32..=262_144);
    let rent_timestamp = if rng.random_range(0..10) == 0 {
        None
    } else {
        Some(rng.random_range(0..block_timestamp))
    };
    RentedNode::new(key, operation, node_size, rent_timestamp)
}

/// A ledger of `tracked` surviving touches and `rolled_back` reverted ones.
pub fn make_ledger(
    rng: &mut StdRng,
    tracked: usize,
    rolled_back: usize,
    block_timestamp: u64,
) -> RentLedger {
    let mut ledger = RentLedger::new();
    for _ in 0..tracked {
        ledger.track(random_node(rng, block_timestamp));
    }
    for _ in 0..rolled_back {
        ledger.track_rollback(random_node(rng, block_timestamp));
    }
    ledger
}
