//! Remote memory layer (§2, §6 external collaborators).
//!
//! Defines the contract a PGAS runtime must provide: process count and
//! rank identity, one-sided atomics on the `used` segment, one-sided
//! put/get on the `data` segment with a composable completion handle, a
//! collective construction step that allocates and broadcasts each
//! rank's segment directory, and a global barrier.
//!
//! [`local::LocalRuntime`] is the one implementation this crate ships: an
//! in-process stand-in for a real network-backed PGAS runtime (RDMA,
//! UPC++, or similar), useful for running the protocol and its test
//! suite without an external cluster. A production deployment would
//! implement [`PgasRuntime`] against real one-sided network operations
//! instead; that backend is outside this crate's scope exactly as the
//! PGAS runtime is named only as a consumed contract in §6.

pub mod local;

use crate::error::DhtError;
use crate::record::Record;

/// A handle to an outstanding one-sided write.
///
/// `write_slot` never blocks on this handle inline (§5); it is retained
/// by [`crate::batch::WriteBatch`] and waited on later, in aggregate.
pub trait RemoteHandle: Send + 'static {
    /// Blocks until this specific write has landed.
    fn wait(self);
}

/// The PGAS runtime contract the protocol layer is built against.
///
/// An implementor represents **one rank's view** of the cluster: `self`
/// is this rank, and every method besides [`PgasRuntime::rank_me`] takes
/// a target rank to operate against (which may be `self` or another
/// rank — the protocol layer treats both uniformly, per §4.1's
/// rationale).
pub trait PgasRuntime<R: Record>: Clone + Send + Sync + 'static {
    /// The completion handle returned by [`PgasRuntime::rput`].
    type Handle: RemoteHandle;

    /// Total number of ranks, `N`.
    fn rank_n(&self) -> usize;

    /// This process's rank id, in `[0, N)`.
    fn rank_me(&self) -> usize;

    /// Collective construction step (§4.6): allocates this rank's `data`
    /// and `used` segments of `capacity_per_rank` slots, zero-initialises
    /// `used`, and participates in the `N`-broadcast exchange that
    /// populates every rank's directory of remote segment handles.
    ///
    /// Every rank must call this with the same `capacity_per_rank`; the
    /// DHT checks this collectively via [`PgasRuntime::rank_capacity`]
    /// immediately afterward and surfaces a mismatch as
    /// [`DhtError::CapacityMismatch`].
    fn construct(&self, capacity_per_rank: usize) -> Result<(), DhtError>;

    /// The per-rank capacity `rank` was constructed with, once the
    /// directory exchange has completed. Used only to verify I3.
    fn rank_capacity(&self, rank: usize) -> usize;

    /// Atomically adds 1 to `used[local]` on `rank` and returns the
    /// pre-increment value, with relaxed memory order (§4.2). The caller
    /// wins the slot iff the returned value is `0`.
    fn fetch_add_used(&self, rank: usize, local: usize) -> i32;

    /// Atomically loads `used[local]` on `rank`, with relaxed memory
    /// order.
    fn load_used(&self, rank: usize, local: usize) -> i32;

    /// Issues an asynchronous one-sided write of `record` into
    /// `data[local]` on `rank`. Does not block; returns a handle the
    /// caller may wait on later.
    fn rput(&self, rank: usize, local: usize, record: R) -> Self::Handle;

    /// Reads `data[local]` on `rank`. Blocks until the read completes.
    ///
    /// Returns `None` if the slot has never been written — this can only
    /// be observed by a caller that violates the phase contract of §5
    /// (querying `used != 0` before the winner's `rput` has landed); a
    /// caller that honours `flush_writes` + barrier before `find` never
    /// sees this for a slot it found `used != 0` on.
    fn rget(&self, rank: usize, local: usize) -> Option<R>;

    /// A global barrier: blocks until every rank has called it.
    fn barrier(&self);
}
