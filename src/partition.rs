//! Partitioning layer (§4.1).
//!
//! Maps a global slot index in `[0, N*C)` to `(owner rank, local slot)`
//! and defines the linear-probe order over the flattened global array.
//! Collisions spill onto a neighbour rank without coordination; every
//! probe step is the same operation regardless of whether the next
//! candidate is local or remote.

/// A decomposed global slot: an owning rank and a local offset within
/// that rank's segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSlot {
    /// The owning rank, in `[0, N)`.
    pub rank: usize,
    /// The local slot within that rank's segments, in `[0, C)`.
    pub local: usize,
}

/// Decomposes global slot indices and steps the probe sequence.
///
/// `capacity_per_rank` (`C`) is fixed for the partitioner's lifetime, per
/// invariant I3.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner {
    rank_n: usize,
    capacity_per_rank: usize,
}

impl Partitioner {
    /// Creates a partitioner over `rank_n` ranks of `capacity_per_rank`
    /// slots each.
    ///
    /// # Panics
    /// Panics if `rank_n` or `capacity_per_rank` is zero — both are
    /// construction-time invariants enforced by the caller
    /// ([`crate::config::DhtConfig::validate`] and the runtime's rank
    /// count) before a partitioner is ever built.
    pub fn new(rank_n: usize, capacity_per_rank: usize) -> Self {
        assert!(rank_n > 0, "rank_n must be >= 1");
        assert!(capacity_per_rank > 0, "capacity_per_rank must be >= 1");
        Self {
            rank_n,
            capacity_per_rank,
        }
    }

    /// Total capacity across all ranks, `N*C`.
    pub fn global_size(&self) -> usize {
        self.rank_n * self.capacity_per_rank
    }

    /// Per-rank capacity, `C`.
    pub fn capacity_per_rank(&self) -> usize {
        self.capacity_per_rank
    }

    /// Number of ranks, `N`.
    pub fn rank_n(&self) -> usize {
        self.rank_n
    }

    /// Decomposes a global slot index `g` into `(rank, local)`.
    pub fn decompose(&self, global: usize) -> GlobalSlot {
        GlobalSlot {
            rank: global / self.capacity_per_rank,
            local: global % self.capacity_per_rank,
        }
    }

    /// The first slot a probe sequence visits for a given 64-bit hash:
    /// `s0 = h mod (N*C)`, decomposed.
    ///
    /// Note the reduction is over the *global* capacity, not the
    /// per-rank capacity — early drafts of the reference reduced `find`
    /// modulo `C` instead, which is incorrect (§9 Open Questions); this
    /// always reduces modulo `N*C`.
    pub fn initial(&self, hash: u64) -> GlobalSlot {
        let global = (hash % self.global_size() as u64) as usize;
        self.decompose(global)
    }

    /// Advances a probe by one global step, wrapping the local offset
    /// into the next rank (modulo `N`) on overflow. Avoids a 64-bit
    /// division on every probe step.
    pub fn advance(&self, slot: GlobalSlot) -> GlobalSlot {
        let mut local = slot.local + 1;
        let mut rank = slot.rank;
        if local == self.capacity_per_rank {
            local = 0;
            rank += 1;
            if rank == self.rank_n {
                rank = 0;
            }
        }
        GlobalSlot { rank, local }
    }
}
