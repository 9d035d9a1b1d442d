//! In-process PGAS runtime (§6 "A PGAS runtime providing...").
//!
//! [`LocalCluster`] stands up `N` [`LocalRuntime`] handles sharing one
//! in-process directory of per-rank segments, one reusable
//! [`std::sync::Barrier`] for the global barrier, and one background
//! write pool that executes `rput`s asynchronously off the calling
//! rank's thread — the in-process analogue of a NIC issuing a one-sided
//! write. Each handle is driven from its own OS thread standing in for a
//! rank, matching the teacher's concurrency tests
//! (`engine::tests::tests_concurrent_ops`), which drive concurrent
//! engine operations from real `std::thread::spawn` threads rather than
//! mocks.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Barrier, OnceLock};
use std::thread::JoinHandle;

use crossbeam::atomic::AtomicCell;
use crossbeam::channel::{Receiver, Sender, bounded, unbounded};
use tracing::trace;

use crate::error::DhtError;
use crate::record::Record;
use crate::runtime::{PgasRuntime, RemoteHandle};

/// One rank's `data`/`used` segments, as seen by every other rank once
/// broadcast.
struct RankSegments<R: Record> {
    used: Vec<AtomicI32>,
    data: Vec<AtomicCell<Option<R>>>,
}

impl<R: Record> RankSegments<R> {
    fn new(capacity: usize) -> Self {
        Self {
            used: (0..capacity).map(|_| AtomicI32::new(0)).collect(),
            data: (0..capacity).map(|_| AtomicCell::new(None)).collect(),
        }
    }
}

/// A completion handle for one `rput`, backed by a one-shot channel.
pub struct PutHandle {
    rx: Receiver<()>,
}

impl RemoteHandle for PutHandle {
    fn wait(self) {
        // The pool either already sent or will send exactly once; a
        // disconnected channel (pool torn down mid-flight) is treated
        // the same as completion since nothing further can land.
        let _ = self.rx.recv();
    }
}

struct Job<R: Record> {
    segments: Arc<RankSegments<R>>,
    local: usize,
    record: R,
    done: Sender<()>,
}

/// The background thread pool that executes `rput`s asynchronously.
///
/// Modeled on the teacher's `EngineConfig::thread_pool_size`, but
/// actually consumed here to size the pool rather than left unused.
struct WritePool<R: Record> {
    tx: Option<Sender<Job<R>>>,
    workers: Vec<JoinHandle<()>>,
}

impl<R: Record> WritePool<R> {
    fn new(threads: usize) -> Self {
        let (tx, rx) = unbounded::<Job<R>>();
        let workers = (0..threads.max(1))
            .map(|_| {
                let rx = rx.clone();
                std::thread::spawn(move || {
                    for job in rx.iter() {
                        job.segments.data[job.local].store(Some(job.record));
                        let _ = job.done.send(());
                    }
                })
            })
            .collect();
        Self {
            tx: Some(tx),
            workers,
        }
    }

    fn submit(&self, segments: Arc<RankSegments<R>>, local: usize, record: R) -> PutHandle {
        let (done_tx, done_rx) = bounded(1);
        let job = Job {
            segments,
            local,
            record,
            done: done_tx,
        };
        self.tx
            .as_ref()
            .expect("write pool sender dropped before shutdown")
            .send(job)
            .expect("write pool workers gone");
        PutHandle { rx: done_rx }
    }
}

impl<R: Record> Drop for WritePool<R> {
    fn drop(&mut self) {
        // Close the channel first so worker loops observe end-of-stream,
        // then join — the atomic domain / scoped-resource discipline of
        // §9 applies here too: the pool must outlive every in-flight job
        // and be torn down deliberately, not implicitly.
        self.tx.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

/// Shared cluster state: the segment directory and the reusable barrier.
struct ClusterShared<R: Record> {
    directory: Vec<OnceLock<Arc<RankSegments<R>>>>,
    barrier: Barrier,
    pool: WritePool<R>,
}

/// One rank's handle onto an in-process PGAS cluster.
///
/// Cheaply `Clone`: every field is `Arc`-shared or a plain index.
pub struct LocalRuntime<R: Record> {
    shared: Arc<ClusterShared<R>>,
    me: usize,
    rank_n: usize,
}

impl<R: Record> Clone for LocalRuntime<R> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            me: self.me,
            rank_n: self.rank_n,
        }
    }
}

/// Stands up an in-process cluster of `rank_n` cooperating [`LocalRuntime`]
/// handles.
///
/// Each returned handle still needs [`PgasRuntime::construct`] called on
/// it (typically from [`crate::dht::DistributedHashTable::new`]) before
/// use — standing up the cluster and constructing the table are distinct
/// collective steps, matching §4.6's "collective across all ranks"
/// language for the latter.
pub struct LocalCluster;

impl LocalCluster {
    /// Builds `rank_n` handles sharing one directory, barrier, and write
    /// pool (`io_threads` workers).
    pub fn new<R: Record>(rank_n: usize, io_threads: usize) -> Vec<LocalRuntime<R>> {
        assert!(rank_n > 0, "rank_n must be >= 1");
        let directory = (0..rank_n).map(|_| OnceLock::new()).collect();
        let shared = Arc::new(ClusterShared {
            directory,
            barrier: Barrier::new(rank_n),
            pool: WritePool::new(io_threads),
        });
        (0..rank_n)
            .map(|me| LocalRuntime {
                shared: shared.clone(),
                me,
                rank_n,
            })
            .collect()
    }
}

impl<R: Record> LocalRuntime<R> {
    fn segments(&self, rank: usize) -> &Arc<RankSegments<R>> {
        self.shared.directory[rank]
            .get()
            .expect("rank not yet constructed — call PgasRuntime::construct first")
    }
}

impl<R: Record> PgasRuntime<R> for LocalRuntime<R> {
    type Handle = PutHandle;

    fn rank_n(&self) -> usize {
        self.rank_n
    }

    fn rank_me(&self) -> usize {
        self.me
    }

    fn construct(&self, capacity_per_rank: usize) -> Result<(), DhtError> {
        if capacity_per_rank == 0 {
            return Err(DhtError::ZeroCapacity);
        }
        let segments = Arc::new(RankSegments::new(capacity_per_rank));
        self.shared.directory[self.me]
            .set(segments)
            .map_err(|_| DhtError::Broadcast(format!("rank {} already broadcast", self.me)))?;
        // Every rank must have broadcast before any rank may address
        // another rank's segments (§4.6 step 4).
        self.shared.barrier.wait();
        Ok(())
    }

    fn rank_capacity(&self, rank: usize) -> usize {
        self.segments(rank).data.len()
    }

    fn fetch_add_used(&self, rank: usize, local: usize) -> i32 {
        let prev = self.segments(rank).used[local].fetch_add(1, Ordering::Relaxed);
        trace!(target_rank = rank, local, prev, "fetch_add_used");
        prev
    }

    fn load_used(&self, rank: usize, local: usize) -> i32 {
        self.segments(rank).used[local].load(Ordering::Relaxed)
    }

    fn rput(&self, rank: usize, local: usize, record: R) -> Self::Handle {
        let segments = self.segments(rank).clone();
        self.shared.pool.submit(segments, local, record)
    }

    fn rget(&self, rank: usize, local: usize) -> Option<R> {
        self.segments(rank).data[local].load()
    }

    fn barrier(&self) {
        self.shared.barrier.wait();
    }
}
