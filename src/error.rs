//! Error types for table construction and runtime-level failures.
//!
//! Per the protocol's own error taxonomy, `insert` and `find` never return
//! a [`DhtError`] for their ordinary outcomes ("table full", "key absent")
//! — those stay plain booleans. `DhtError` is reserved for the
//! construction-time and runtime-level failure class: a capacity mismatch
//! across ranks, an invalid configuration, or a propagated failure from
//! the underlying [`crate::runtime::PgasRuntime`].

use thiserror::Error;

/// Errors surfaced by table construction and by the [`crate::runtime::PgasRuntime`]
/// a table is built on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DhtError {
    /// `capacity_per_rank` (`C`) was zero.
    #[error("capacity_per_rank must be >= 1")]
    ZeroCapacity,

    /// `batch_fraction` fell outside `(0.0, 1.0]`.
    #[error("invalid batch fraction {0}: must be in (0.0, 1.0]")]
    InvalidBatchFraction(f64),

    /// A rank reported a per-rank capacity different from the one this
    /// rank constructed with. Violates invariant I3 (`C` identical on
    /// every rank).
    #[error("rank {rank} reports capacity {found}, expected {expected} (I3 requires identical C across every rank)")]
    CapacityMismatch {
        /// The rank whose reported capacity disagreed.
        rank: usize,
        /// The capacity this rank was constructed with.
        expected: usize,
        /// The capacity actually reported by `rank`.
        found: usize,
    },

    /// The runtime failed to allocate a rank's `data`/`used` segments.
    #[error("runtime allocation failed: {0}")]
    RuntimeAlloc(String),

    /// The collective directory-broadcast step (§4.6) failed.
    #[error("collective broadcast failed: {0}")]
    Broadcast(String),

    /// Any other internal invariant violation (e.g. a poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}
