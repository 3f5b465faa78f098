//! Tessera Benchmark Suite
//!
//! This crate contains performance benchmarks for the Tessera storage-rent
//! subsystem.
//!
//! Run all benchmarks:
//! ```bash
//! cargo bench -p tessera-bench
//! ```
//!
//! Run a specific benchmark group:
//! ```bash
//! cargo bench -p tessera-bench --bench storage_rent_bench
//! ```

pub mod helpers;
