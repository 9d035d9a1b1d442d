//! Table configuration.
//!
//! Mirrors the teacher engine's pattern of a plain config struct validated
//! eagerly at construction rather than deferred to first use.

use crate::error::DhtError;

/// Construction-time configuration for a [`crate::dht::DistributedHashTable`].
///
/// All ranks must construct with the same `capacity_per_rank` (invariant
/// I3, §3); the table checks this collectively during construction and
/// returns [`DhtError::CapacityMismatch`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhtConfig {
    /// Per-rank slot capacity, `C`. Must be >= 1.
    pub capacity_per_rank: usize,

    /// Fraction of `C` used to derive the write-batch size (§4.5). The
    /// reference design uses `0.01` (1%). Must be in `(0.0, 1.0]`.
    pub batch_fraction: f64,
}

impl Default for DhtConfig {
    fn default() -> Self {
        Self {
            capacity_per_rank: 1024,
            batch_fraction: 0.01,
        }
    }
}

impl DhtConfig {
    /// Validates the configuration, independent of any particular runtime.
    pub fn validate(&self) -> Result<(), DhtError> {
        if self.capacity_per_rank == 0 {
            return Err(DhtError::ZeroCapacity);
        }
        if !(self.batch_fraction > 0.0 && self.batch_fraction <= 1.0) {
            return Err(DhtError::InvalidBatchFraction(self.batch_fraction));
        }
        Ok(())
    }

    /// The target number of in-flight writes per rank before a
    /// synchronising wait (§4.5): `max(1, C * batch_fraction)`.
    pub fn batch_size(&self) -> usize {
        ((self.capacity_per_rank as f64) * self.batch_fraction)
            .floor()
            .max(1.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_size_is_one_percent_by_default() {
        let cfg = DhtConfig {
            capacity_per_rank: 1000,
            ..DhtConfig::default()
        };
        assert_eq!(cfg.batch_size(), 10);
    }

    #[test]
    fn batch_size_never_rounds_to_zero() {
        let cfg = DhtConfig {
            capacity_per_rank: 4,
            batch_fraction: 0.01,
            ..DhtConfig::default()
        };
        assert_eq!(cfg.batch_size(), 1);
    }

    #[test]
    fn rejects_zero_capacity() {
        let cfg = DhtConfig {
            capacity_per_rank: 0,
            ..DhtConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(DhtError::ZeroCapacity)));
    }

    #[test]
    fn rejects_out_of_range_batch_fraction() {
        let cfg = DhtConfig {
            batch_fraction: 0.0,
            ..DhtConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(DhtError::InvalidBatchFraction(_))
        ));

        let cfg = DhtConfig {
            batch_fraction: 1.5,
            ..DhtConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(DhtError::InvalidBatchFraction(_))
        ));
    }
}
