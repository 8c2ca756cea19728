// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four consumer pacing strategies. They differ only in how the
//! consumer batches drains from the ring; the producer side of the
//! contract (§4.2) is identical in every mode. Modeled as a latched enum
//! inspected once per batch, not a trait object inspected per event.

use argus_core::OptimizationStrategy;

/// Files watched at or above this count select `LargeBatch` under `Auto`.
const LARGE_BATCH_THRESHOLD: usize = 20;
/// Files watched at or above this count (and below the large threshold)
/// select `SmallBatch` under `Auto`.
const SMALL_BATCH_THRESHOLD: usize = 3;

/// Maximum events drained per wake in `SmallBatch` mode.
pub const SMALL_BATCH_SIZE: usize = 8;
/// Events drained per unrolled iteration in `LargeBatch` mode.
pub const LARGE_BATCH_UNROLL: usize = 4;
/// Unrolled iterations per wake in `LargeBatch` mode (so up to
/// `LARGE_BATCH_UNROLL * LARGE_BATCH_ITERATIONS` events drain per wake).
pub const LARGE_BATCH_ITERATIONS: usize = 16;

/// A processing strategy resolved to a concrete pacing policy — `Auto`
/// never appears here, it has already been resolved to one of the other
/// three and latched for the lifetime of the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedStrategy {
    SingleEvent,
    SmallBatch,
    LargeBatch,
}

impl ResolvedStrategy {
    /// Resolves `Auto` from the watched-file count observed at consumer
    /// start; a non-`Auto` strategy resolves to itself unconditionally.
    pub fn resolve(configured: OptimizationStrategy, watched_file_count: usize) -> Self {
        match configured {
            OptimizationStrategy::SingleEvent => ResolvedStrategy::SingleEvent,
            OptimizationStrategy::SmallBatch => ResolvedStrategy::SmallBatch,
            OptimizationStrategy::LargeBatch => ResolvedStrategy::LargeBatch,
            OptimizationStrategy::Auto => {
                if watched_file_count >= LARGE_BATCH_THRESHOLD {
                    ResolvedStrategy::LargeBatch
                } else if watched_file_count >= SMALL_BATCH_THRESHOLD {
                    ResolvedStrategy::SmallBatch
                } else {
                    ResolvedStrategy::SingleEvent
                }
            }
        }
    }

    /// Upper bound on events drained in one consumer wake, used by the
    /// drain loop to decide when to stop even if the ring still has more.
    pub fn max_batch(&self) -> usize {
        match self {
            ResolvedStrategy::SingleEvent => 1,
            ResolvedStrategy::SmallBatch => SMALL_BATCH_SIZE,
            ResolvedStrategy::LargeBatch => LARGE_BATCH_UNROLL * LARGE_BATCH_ITERATIONS,
        }
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
