//! Protocol layer (§4.2-4.4): `insert`, `find`, and the table object
//! itself.

use tracing::{debug, info, trace};

use crate::batch::WriteBatch;
use crate::config::DhtConfig;
use crate::error::DhtError;
use crate::partition::Partitioner;
use crate::record::Record;
use crate::runtime::PgasRuntime;

/// A distributed, open-addressing hash table for fixed-size records,
/// partitioned across a fixed set of cooperating ranks.
///
/// Constructed collectively: every rank must call [`DistributedHashTable::new`]
/// with the same [`DhtConfig::capacity_per_rank`] (invariant I3). Not
/// resizable, no deletion, no iteration (§1 Non-goals).
///
/// # Phase contract
///
/// The table does not enforce ordering between its own insert and find
/// phases (§5) — that discipline is the caller's: drive a collective
/// insert phase, call [`DistributedHashTable::flush_writes`] on every
/// rank, synchronise with a runtime barrier, and only then begin a
/// collective find phase. Interleaving the two phases yields undefined
/// results (stale or absent reads of recently-inserted records).
pub struct DistributedHashTable<R: Record, Rt: PgasRuntime<R>> {
    runtime: Rt,
    partitioner: Partitioner,
    batch: WriteBatch<Rt::Handle>,
}

impl<R: Record, Rt: PgasRuntime<R>> DistributedHashTable<R, Rt> {
    /// Constructs the table collectively (§4.6). Every rank must call
    /// this with an equal `config.capacity_per_rank`; a mismatch is
    /// detected after the directory exchange and reported as
    /// [`DhtError::CapacityMismatch`].
    pub fn new(runtime: Rt, config: DhtConfig) -> Result<Self, DhtError> {
        config.validate()?;
        runtime.construct(config.capacity_per_rank)?;

        let rank_n = runtime.rank_n();
        for rank in 0..rank_n {
            let found = runtime.rank_capacity(rank);
            if found != config.capacity_per_rank {
                return Err(DhtError::CapacityMismatch {
                    rank,
                    expected: config.capacity_per_rank,
                    found,
                });
            }
        }

        let partitioner = Partitioner::new(rank_n, config.capacity_per_rank);
        let batch_size = config.batch_size();
        info!(
            rank_n,
            capacity_per_rank = config.capacity_per_rank,
            global_size = partitioner.global_size(),
            batch_size,
            "constructed distributed hash table"
        );

        Ok(Self {
            runtime,
            partitioner,
            batch: WriteBatch::new(batch_size),
        })
    }

    /// Inserts `record`, probing linearly from `record.key().hash() mod
    /// global_size()` until a slot is won or the probe sequence of
    /// length `N*C` is exhausted (§4.3).
    ///
    /// The record's write is issued asynchronously and is not guaranteed
    /// visible to other ranks until [`DistributedHashTable::flush_writes`]
    /// has been called and a barrier observed (§4.4, §5).
    pub fn insert(&mut self, record: R) -> bool {
        let hash = record.key().hash();
        let mut slot = self.partitioner.initial(hash);

        for _ in 0..self.partitioner.global_size() {
            let prev = self.runtime.fetch_add_used(slot.rank, slot.local);
            if prev == 0 {
                trace!(rank = slot.rank, local = slot.local, "reservation won");
                let handle = self.runtime.rput(slot.rank, slot.local, record);
                self.batch.register(handle);
                return true;
            }
            trace!(
                rank = slot.rank,
                local = slot.local,
                prev,
                "reservation lost"
            );
            slot = self.partitioner.advance(slot);
        }

        info!("insert failed: table full");
        false
    }

    /// Looks up `key`, probing linearly from `key.hash() mod
    /// global_size()` until a match is found or the probe sequence is
    /// exhausted (§4.4).
    ///
    /// Must only be called after the phase contract of §5 has been
    /// honoured by every inserting rank; calling `find` while inserts
    /// are still in flight can observe a reserved-but-not-yet-written
    /// slot and is undefined behaviour at the protocol level (though
    /// memory-safe in this implementation — see
    /// [`crate::runtime::PgasRuntime::rget`]).
    pub fn find(&mut self, key: &R::Key) -> Option<R> {
        use crate::record::KeyView;

        let hash = key.hash();
        let mut slot = self.partitioner.initial(hash);

        for _ in 0..self.partitioner.global_size() {
            let used = self.runtime.load_used(slot.rank, slot.local);
            if used != 0 {
                if let Some(record) = self.runtime.rget(slot.rank, slot.local) {
                    if record.matches(key) {
                        trace!(rank = slot.rank, local = slot.local, "find hit");
                        return Some(record);
                    }
                }
            }
            slot = self.partitioner.advance(slot);
        }

        None
    }

    /// Blocks until every write this rank has issued so far has landed
    /// (§4.5). Required before a runtime barrier separates the insert
    /// phase from the find phase (§5).
    pub fn flush_writes(&mut self) {
        self.batch.flush();
        debug!(
            flush_count = self.batch.flush_count(),
            "flush_writes complete"
        );
    }

    /// Per-rank capacity, `C`.
    pub fn size(&self) -> usize {
        self.partitioner.capacity_per_rank()
    }

    /// Total capacity across all ranks, `N*C`.
    pub fn global_size(&self) -> usize {
        self.partitioner.global_size()
    }
}
