//! # Tessera Storage Rent
//!
//! Storage-rent accounting for the Tessera transaction-execution path.
//!
//! Every persistent trie node occupies node memory for as long as it lives,
//! so every transaction that touches a node pays an occupancy charge
//! proportional to the node's size and the time elapsed since the node last
//! settled, bounded by a per-node cap and gated by a per-operation waiver
//! threshold. Transactions that revert still pay a punitive fraction of the
//! accrued rent for what they touched, so speculative execution is never
//! rent-free.
//!
//! The crate is pure bookkeeping: the trie reports node sizes and stored
//! rent timestamps, the executor reports touches and the block timestamp,
//! and this crate turns them into three numbers and a write-back set. It
//! performs no I/O, holds no locks, and uses integer arithmetic only, so
//! results are bit-identical across platforms.
//!
//! ## Quick start
//!
//! ```rust
//! use tessera_storage_rent::{OperationType, RentConfig, RentLedger, RentedNode};
//!
//! let config = RentConfig::default();
//! let mut ledger = RentLedger::new();
//!
//! // The executor resolved a 1 KiB account node that last settled at
//! // timestamp 0; the executing block's timestamp is 10_000_000 ms.
//! ledger.track(RentedNode::new(
//!     b"account:alice".as_slice().into(),
//!     OperationType::WriteAccount,
//!     1_024,
//!     Some(0),
//! ));
//!
//! let settlement = ledger.settle(&config, 10_000_000).unwrap();
//! assert_eq!(settlement.payable_rent, 4_882);
//! // Fully settled, so the node's clock restarts at the block timestamp.
//! assert_eq!(settlement.timestamp_updates[0].1, 10_000_000);
//! ```
//!
//! See [`policy`] for the formulas and [`config`] for the parameter set.

pub mod config;
pub mod error;
pub mod ledger;
pub mod node;
pub mod policy;


// Re-exports for convenience.
pub use config::RentConfig;
pub use error::RentError;
pub use ledger::{RentLedger, RentSettlement};
pub use node::{OperationType, RentKey, RentedNode};
