//! The compiled hardware schedule handed to the scan driver.

use crate::channels::ChannelSelector;

/// Per-scan reporting behavior requested by a client, merged per bucket.
///
/// Stored as a bitset so bucket merging stays a couple of bit ops:
/// `NO_BATCH` survives only if every request in the bucket asked for it,
/// the other two survive if any request asked for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportEvents(u8);

impl ReportEvents {
    /// Deliver results immediately, never buffer them in firmware.
    pub const NO_BATCH: Self = Self(1 << 0);
    /// Report after each completed scan of the bucket.
    pub const AFTER_EACH_SCAN: Self = Self(1 << 1);
    /// Invoke the per-result ("full") callback for each observation.
    pub const FULL_RESULT: Self = Self(1 << 2);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for ReportEvents {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

impl std::ops::BitOrAssign for ReportEvents {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One hardware bucket: a period and the channel work scheduled at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpec {
    /// Dense id (0..num_buckets) under which the driver tags results.
    pub bucket_id: u32,
    /// Scan repeat interval in milliseconds.
    pub period_ms: u32,
    /// Merged reporting flags of every request folded into this bucket.
    pub report_events: ReportEvents,
    /// Upper period bound for exponential back-off buckets; 0 otherwise.
    pub max_period_ms: u32,
    /// Number of back-off steps from `period_ms` to `max_period_ms`; 0 otherwise.
    pub step_count: u32,
    /// Channels or bands to visit.
    pub selector: ChannelSelector,
}

/// The full schedule installed into the radio. Rebuilt wholesale on every
/// scheduler update and treated as immutable once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareSchedule {
    /// GCD of all bucket periods; the interval the radio actually wakes at.
    pub base_period_ms: u32,
    /// Cap on access points reported per physical scan.
    pub max_ap_per_scan: u32,
    /// Number of scans firmware may buffer before forcing delivery.
    pub report_threshold_num_scans: u32,
    /// Buffer-fill percentage that forces delivery.
    pub report_threshold_percent: u32,
    /// Network ids that need active probing, deduplicated and sorted.
    pub hidden_network_ids: Vec<i32>,
    /// Active buckets, densely numbered in lattice order.
    pub buckets: Vec<BucketSpec>,
}

impl HardwareSchedule {
    #[must_use]
    pub fn bucket(&self, bucket_id: u32) -> Option<&BucketSpec> {
        self.buckets.iter().find(|b| b.bucket_id == bucket_id)
    }
}
