//! Pure rent arithmetic.
//!
//! Every function here is deterministic, side-effect free, and uses integer
//! arithmetic only (u128 intermediates, clamped back to u64). Two independent
//! nodes evaluating the same inputs must produce bit-identical charges; a
//! one-unit divergence is a consensus fork.

use crate::{config::RentConfig, error::RentError};

/// Milliseconds a node has been accruing rent at `block_timestamp`.
///
/// A node that has never paid rent (`rent_timestamp == None`) has zero
/// duration: its clock starts at the current block, for free.
///
/// A stored timestamp ahead of the block timestamp is a broken upstream
/// invariant and is rejected, never clamped.
pub fn duration(rent_timestamp: Option<u64>, block_timestamp: u64) -> Result<u64, RentError> {
    match rent_timestamp {
        None => Ok(0),
        Some(ts) => block_timestamp
            .checked_sub(ts)
            .ok_or(RentError::TimestampOrdering {
                rent_timestamp: ts,
                block_timestamp,
            }),
    }
}

/// Accrued rent in gas units for a node of `node_size` bytes over
/// `duration_ms` milliseconds.
///
/// # Formula
///
/// ```text
/// rent_due = node_size × duration_ms / rate_divisor
/// ```
///
/// computed in u128 and saturated to u64. Monotonically non-decreasing in
/// both size and duration; zero size or zero duration accrues nothing.
///
/// A zero divisor yields zero (rent disabled); [`validate_config`] rejects
/// such configs up front.
pub fn rent_due(node_size: u64, duration_ms: u64, rate_divisor: u64) -> u64 {
    if rate_divisor == 0 {
        return 0;
    }
    let accrued = (node_size as u128) * (duration_ms as u128) / (rate_divisor as u128);
    accrued.min(u64::MAX as u128) as u64
}

/// The amount actually charged for `rent_due` accrued gas.
///
/// Amounts at or below `threshold` are waived entirely (sub-economic
/// charges are not worth their bookkeeping); anything above it is charged,
/// capped at `cap` so a single large stale node cannot produce an unbounded
/// one-shot fee. The result is therefore always `0` or in
/// `(threshold, cap]`.
pub fn payable_rent(rent_due: u64, cap: u64, threshold: u64) -> u64 {
    if rent_due <= threshold {
        0
    } else {
        rent_due.min(cap)
    }
}

/// The rent timestamp to persist after settling a node.
///
/// Three regimes:
///
/// - **Fully settled** (`rent_due == 0`, or above threshold and within the
///   cap): the node is paid up through the current block, so the new
///   timestamp is `block_timestamp`. Never-rented nodes land here too,
///   which starts their clock.
/// - **Capped** (`rent_due > cap`): only `cap / rent_due` of the elapsed
///   time was actually paid for, so the timestamp advances by exactly that
///   fraction (integer division). The unpaid remainder keeps accruing from
///   where it left off instead of being forgiven.
/// - **Below threshold** (nothing charged): the timestamp does not move, so
///   the node keeps accruing against its original timestamp until it
///   eventually crosses the threshold.
pub fn new_timestamp(
    rent_due: u64,
    rent_timestamp: Option<u64>,
    block_timestamp: u64,
    cap: u64,
    threshold: u64,
) -> Result<u64, RentError> {
    let Some(last_paid) = rent_timestamp else {
        return Ok(block_timestamp);
    };

    if rent_due == 0 || (rent_due > threshold && rent_due <= cap) {
        return Ok(block_timestamp);
    }

    if rent_due > cap {
        let elapsed = duration(Some(last_paid), block_timestamp)?;
        // paid_for <= elapsed because cap < rent_due, so the result never
        // runs ahead of the block timestamp.
        let paid_for = (elapsed as u128) * (cap as u128) / (rent_due as u128);
        return Ok(last_paid.saturating_add(paid_for.min(u64::MAX as u128) as u64));
    }

    // Accrued but under the threshold: keep the clock running.
    Ok(last_paid)
}

/// Rollback fee base: `percent` % of a computed rent amount, rounded down.
pub fn fee_by_rent(computed_rent: u64, percent: u64) -> u64 {
    let fee = (computed_rent as u128) * (percent as u128) / 100;
    fee.min(u64::MAX as u128) as u64
}

/// Validate that a [`RentConfig`] is internally consistent.
pub fn validate_config(config: &RentConfig) -> Result<(), RentError> {
    if config.rent_rate_divisor == 0 {
        return Err(RentError::InvalidConfig {
            reason: "rent_rate_divisor must be > 0".to_string(),
        });
    }
    if config.rollback_fee_percent > 100 {
        return Err(RentError::InvalidConfig {
            reason: format!(
                "rollback_fee_percent ({}) must be 0-100",
                config.rollback_fee_percent
            ),
        });
    }
    Ok(())
}
