//! # dht
//!
//! A **distributed, open-addressing hash table** for fixed-size records,
//! partitioned across a fixed set of cooperating ranks in a Partitioned
//! Global Address Space (PGAS). Built for concurrent insertion and
//! lookup during a parallel de-Bruijn-graph-style assembly pass: every
//! rank inserts disjoint k-mers into one globally-addressable table,
//! then every rank queries the table to follow contigs.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              DistributedHashTable<R, Rt>                  │
//! │  ┌────────────┐   ┌───────────────┐   ┌─────────────────┐ │
//! │  │ partition  │   │    runtime    │   │     batch       │ │
//! │  │ (probe     │──▶│ (PGAS:        │──▶│ (pending rput   │ │
//! │  │  order)    │   │  atomics,     │   │  handles,       │ │
//! │  │            │   │  rput/rget)   │   │  flush)         │ │
//! │  └────────────┘   └───────────────┘   └─────────────────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`partition`] | Global slot ↔ `(rank, local)` decomposition and probe order |
//! | [`record`] | `Record`/`KeyView` contracts, plus a reference `KmerPair` |
//! | [`runtime`] | The `PgasRuntime` contract and an in-process implementation |
//! | [`batch`] | Write-pipelining: the pending-handle aggregate and flush threshold |
//! | [`dht`] | The table itself: `insert`, `find`, `flush_writes` |
//! | [`config`] | Construction-time configuration |
//! | [`error`] | Construction and runtime-level error types |
//!
//! ## Key Properties
//!
//! - **One-sided remote access** — any rank may read or mutate any slot
//!   without the owning rank's active participation.
//! - **Lock-free slot reservation** — concurrent linear probing resolves
//!   to a unique winner per slot via one atomic fetch-add, no locks.
//! - **Write pipelining** — `rput`s are issued asynchronously and
//!   batched; `flush_writes` + a runtime barrier is what makes a
//!   subsequent `find` phase observe them.
//!
//! Not resizable, no deletion, no iteration, no durability (its lifetime
//! is one parallel job) — see each module's docs for the invariants this
//! implies.
//!
//! ## Quick Start
//!
//! ```rust
//! use dht::config::DhtConfig;
//! use dht::dht::DistributedHashTable;
//! use dht::record::{K, KmerPair};
//! use dht::runtime::local::LocalCluster;
//!
//! // Stand up a single-rank in-process cluster (a real deployment would
//! // supply N ranks across real processes instead).
//! let mut ranks = LocalCluster::new::<KmerPair>(1, /* io_threads */ 2);
//! let mut table = DistributedHashTable::new(
//!     ranks.remove(0),
//!     DhtConfig { capacity_per_rank: 64, ..DhtConfig::default() },
//! ).unwrap();
//!
//! let record = KmerPair::with_hash(42, [b'A'; K]);
//! assert!(table.insert(record));
//!
//! // Phase contract: flush before any rank begins finding.
//! table.flush_writes();
//!
//! assert_eq!(table.find(&record.key), Some(record));
//! ```

pub mod batch;
pub mod config;
pub mod dht;
pub mod error;
pub mod partition;
pub mod record;
pub mod runtime;

pub use config::DhtConfig;
pub use dht::DistributedHashTable;
pub use error::DhtError;
