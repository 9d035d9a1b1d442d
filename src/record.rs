//! Record and key-view contracts (§3).
//!
//! The table is generic over a caller-supplied record type. Parsing and
//! hashing the underlying k-mer string are out of scope (§1) — this
//! module only defines the interface the protocol layer relies on, plus
//! a small reference record (`PackedKmer`) used by this crate's own
//! tests and benchmarks.

/// A key view: whatever a `find` query is expressed in terms of.
///
/// Distinct from [`Record`] because a lookup may be driven by a k-mer
/// string the caller has not (and may never) store a full record for.
pub trait KeyView: Copy + Send + Sync {
    /// A full-width hash of the key. Must agree with the hash a stored
    /// [`Record`] with the same key produces from [`Record::key`].
    fn hash(&self) -> u64;
}

/// The record type stored in the table.
///
/// Records are trivially copyable and memcpy-safe across processes — no
/// indirection is permitted, since a record may be transported by a
/// one-sided `rput`/`rget` to or from a process that never decodes it
/// beyond a byte copy.
pub trait Record: Copy + Send + Sync + 'static {
    /// The key view type used to query this record.
    type Key: KeyView;

    /// Projects this record's key back out, e.g. for re-hashing or
    /// directory bookkeeping.
    fn key(&self) -> Self::Key;

    /// Whether this record's key matches a query key view.
    fn matches(&self, key: &Self::Key) -> bool;
}

/// Fixed length of the reference k-mer's base sequence.
pub const K: usize = 31;

/// The key portion of a k-mer/extension pair: the base sequence and its
/// precomputed hash.
///
/// Hashing the base sequence is explicitly out of scope (§1); callers are
/// expected to supply `hash` from their own k-mer hasher. This type
/// treats `hash` as already computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KmerKey {
    /// Precomputed full-width hash of `bases`.
    pub hash: u64,
    /// The fixed-length base sequence.
    pub bases: [u8; K],
}

impl KeyView for KmerKey {
    fn hash(&self) -> u64 {
        self.hash
    }
}

/// A k-mer/extension pair: a k-mer key plus its forward and backward
/// extension bases, as produced during a de-Bruijn-graph assembly pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerPair {
    /// The k-mer key.
    pub key: KmerKey,
    /// The base that extends the k-mer forward.
    pub forward_ext: u8,
    /// The base that extends the k-mer backward.
    pub backward_ext: u8,
}

impl Record for KmerPair {
    type Key = KmerKey;

    fn key(&self) -> KmerKey {
        self.key
    }

    fn matches(&self, key: &KmerKey) -> bool {
        self.key == *key
    }
}

impl KmerPair {
    /// Builds a reference k-mer pair from an already-computed hash and a
    /// distinguishing base sequence (tests only need these to be
    /// distinct, not biologically meaningful).
    pub fn with_hash(hash: u64, bases: [u8; K]) -> Self {
        Self {
            key: KmerKey { hash, bases },
            forward_ext: b'A',
            backward_ext: b'A',
        }
    }
}
