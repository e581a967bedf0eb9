//! The period lattice and the bucket slots requests are folded into.

use crate::error::{BuildError, Result};

/// The fixed menu of periods buckets may be scheduled at.
///
/// `periods_ms` is preference-ordered: compaction reassigns demand toward
/// lower indices, so earlier entries are the ones that survive when the
/// hardware runs out of bucket slots. One extra slot past the regular
/// entries is reserved for exponential back-off scans.
#[derive(Debug, Clone)]
pub struct PeriodLattice {
    periods_ms: Vec<u32>,
    quantum_ms: u32,
    default_period_ms: u32,
}

impl PeriodLattice {
    pub fn new(periods_ms: Vec<u32>, quantum_ms: u32, default_period_ms: u32) -> Result<Self> {
        if periods_ms.is_empty() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "period lattice must not be empty",
            )));
        }
        if quantum_ms == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "period quantum must be >= 1",
            )));
        }
        for &p in &periods_ms {
            if p == 0 || p % quantum_ms != 0 || !(p / quantum_ms).is_power_of_two() {
                return Err(eyre::Report::new(BuildError::InvalidConfig(
                    "lattice periods must be power-of-two multiples of the quantum",
                )));
            }
        }
        if default_period_ms == 0 || default_period_ms % quantum_ms != 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "default period must be a multiple of the quantum",
            )));
        }
        Ok(Self {
            periods_ms,
            quantum_ms,
            default_period_ms,
        })
    }

    /// Number of regular (non-back-off) lattice indices.
    #[must_use]
    pub fn num_regular(&self) -> usize {
        self.periods_ms.len()
    }

    /// Index of the slot reserved for exponential back-off scans.
    #[must_use]
    pub fn backoff_index(&self) -> usize {
        self.periods_ms.len()
    }

    /// Total slot count (regular slots plus the back-off slot).
    #[must_use]
    pub fn num_slots(&self) -> usize {
        self.periods_ms.len() + 1
    }

    /// Period of a regular lattice index.
    #[must_use]
    pub fn period(&self, index: usize) -> u32 {
        self.periods_ms[index]
    }

    #[must_use]
    pub fn quantum_ms(&self) -> u32 {
        self.quantum_ms
    }

    #[must_use]
    pub fn default_period_ms(&self) -> u32 {
        self.default_period_ms
    }

    /// Regular index whose period is closest to `period_ms`, searching only
    /// indices below `limit`.
    ///
    /// The scan runs in ascending index order with a strict comparison, so
    /// the first index achieving the minimum difference wins ties. Returns
    /// `None` when `limit` leaves no candidates.
    #[must_use]
    pub fn nearest_regular_index(&self, period_ms: u32, limit: usize) -> Option<usize> {
        let limit = limit.min(self.periods_ms.len());
        let mut best = None;
        let mut best_diff = u32::MAX;
        for (i, &p) in self.periods_ms[..limit].iter().enumerate() {
            let diff = p.abs_diff(period_ms);
            if diff < best_diff {
                best_diff = diff;
                best = Some(i);
            }
        }
        best
    }
}

impl Default for PeriodLattice {
    fn default() -> Self {
        let cfg = bgscan_config::LatticeCfg::default();
        Self {
            periods_ms: cfg.periods_ms,
            quantum_ms: cfg.quantum_ms,
            default_period_ms: cfg.default_period_ms,
        }
    }
}

/// One occupied schedule slot: its period and the requests folded into it.
///
/// Members are indices into the request slice passed to the current
/// `update_schedule` call; buckets never outlive that call.
#[derive(Debug)]
pub(crate) struct Bucket {
    pub period_ms: u32,
    pub members: Vec<usize>,
    /// For the back-off slot: the single request whose back-off parameters
    /// configure this bucket. Set once, when the slot is first occupied.
    pub backoff_donor: Option<usize>,
}

impl Bucket {
    fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            members: Vec::new(),
            backoff_donor: None,
        }
    }
}

/// Fixed-size array of optional buckets with a maintained active count.
#[derive(Debug)]
pub(crate) struct BucketList {
    slots: Vec<Option<Bucket>>,
    active: usize,
    backoff_index: usize,
}

impl BucketList {
    pub fn new(num_slots: usize) -> Self {
        let mut slots = Vec::with_capacity(num_slots);
        slots.resize_with(num_slots, || None);
        Self {
            slots,
            active: 0,
            backoff_index: num_slots - 1,
        }
    }

    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.active = 0;
    }

    pub fn get_or_create(&mut self, index: usize, period_ms: u32) -> &mut Bucket {
        let slot = &mut self.slots[index];
        if slot.is_none() {
            self.active += 1;
        }
        slot.get_or_insert_with(|| Bucket::new(period_ms))
    }

    /// Remove and return the bucket at `index`, if any.
    pub fn take(&mut self, index: usize) -> Option<Bucket> {
        let bucket = self.slots[index].take();
        if bucket.is_some() {
            self.active -= 1;
        }
        bucket
    }

    pub fn get(&self, index: usize) -> Option<&Bucket> {
        self.slots[index].as_ref()
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.slots[index].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    /// Active slots excluding the back-off slot.
    pub fn active_regular_count(&self) -> usize {
        if self.is_active(self.backoff_index) {
            self.active - 1
        } else {
            self.active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> PeriodLattice {
        PeriodLattice::default()
    }

    #[test]
    fn default_lattice_shape() {
        let l = lattice();
        assert_eq!(l.num_regular(), 8);
        assert_eq!(l.backoff_index(), 8);
        assert_eq!(l.num_slots(), 9);
        assert_eq!(l.period(0), 40_000);
        assert_eq!(l.quantum_ms(), 10_000);
    }

    #[test]
    fn nearest_index_prefers_first_on_tie() {
        // 30000 is equidistant from 40000 (index 0) and 20000 (index 1);
        // the lower index wins.
        let l = PeriodLattice::new(vec![40_000, 20_000], 10_000, 40_000).unwrap();
        assert_eq!(l.nearest_regular_index(30_000, 2), Some(0));
    }

    #[test]
    fn nearest_index_respects_limit() {
        let l = lattice();
        // Unrestricted, 10s lands on the dedicated 10s slot (index 4).
        assert_eq!(l.nearest_regular_index(10_000, l.num_regular()), Some(4));
        // Restricted below index 4, the closest remaining period is 20s.
        assert_eq!(l.nearest_regular_index(10_000, 4), Some(1));
        // No candidates at all.
        assert_eq!(l.nearest_regular_index(10_000, 0), None);
    }

    #[test]
    fn lattice_rejects_bad_periods() {
        assert!(PeriodLattice::new(vec![], 10_000, 40_000).is_err());
        assert!(PeriodLattice::new(vec![30_000], 10_000, 40_000).is_err());
        assert!(PeriodLattice::new(vec![40_000], 0, 40_000).is_err());
        assert!(PeriodLattice::new(vec![40_000], 10_000, 15_000).is_err());
    }

    #[test]
    fn bucket_list_counts() {
        let mut buckets = BucketList::new(4);
        assert_eq!(buckets.active_count(), 0);

        buckets.get_or_create(0, 40_000).members.push(0);
        buckets.get_or_create(0, 40_000).members.push(1);
        assert_eq!(buckets.active_count(), 1);
        assert_eq!(buckets.get(0).map(|b| b.members.len()), Some(2));

        // Back-off slot (index 3) is excluded from the regular count.
        buckets.get_or_create(3, 0);
        assert_eq!(buckets.active_count(), 2);
        assert_eq!(buckets.active_regular_count(), 1);

        let taken = buckets.take(0).expect("bucket present");
        assert_eq!(taken.members, vec![0, 1]);
        assert_eq!(buckets.active_count(), 1);
        assert!(buckets.take(0).is_none());
        assert_eq!(buckets.active_count(), 1);
    }
}
