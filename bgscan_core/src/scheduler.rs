//! The background scan scheduler.
//!
//! Takes the full set of live scan requests and compiles the best hardware
//! schedule it can. Each request lands in the predefined bucket whose period
//! is closest to what it asked for; when demand needs more distinct periods
//! than the chip supports, the longest-period buckets are folded into the
//! next-closest surviving period until the schedule fits. The result is a
//! [`HardwareSchedule`] plus a request→bucket map used afterwards to hand
//! shared physical results back to the right logical requesters.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use bgscan_traits::{
    BucketSpec, HardwareSchedule, ReportEvents, ScanBatch, ScanObservation,
};

use crate::bucket::{Bucket, BucketList, PeriodLattice};
use crate::channels::{ChannelCollection, ChannelPlan};
use crate::error::{BuildError, Result};
use crate::filter;
use crate::request::{RequestId, ScanRequest};
use crate::util::gcd_u32;

/// Buffer-fill percentage assigned to every published schedule.
const REPORT_THRESHOLD_PERCENT: u32 = 100;

/// Hardware capacity limits the compiled schedule must respect.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Number of simultaneously scheduled buckets the chip supports.
    pub max_buckets: usize,
    /// Longest explicit channel list a single bucket may carry.
    pub max_channels: usize,
    /// Scans firmware may buffer before forcing delivery.
    pub max_scans_to_batch: u32,
    /// Cap on access points reported per physical scan.
    pub max_ap_per_scan: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self::from(&bgscan_config::Limits::default())
    }
}

/// The published (schedule, request→bucket map) pair.
///
/// Replaced wholesale on every update; a reader holding an `Arc` to one
/// snapshot always sees a schedule and a map produced by the same update.
#[derive(Debug)]
pub struct ScheduleSnapshot {
    schedule: HardwareSchedule,
    assignments: HashMap<RequestId, u32>,
}

impl ScheduleSnapshot {
    #[must_use]
    pub fn schedule(&self) -> &HardwareSchedule {
        &self.schedule
    }

    /// Dense bucket id currently serving the request, if it is scheduled.
    #[must_use]
    pub fn bucket_for(&self, id: RequestId) -> Option<u32> {
        self.assignments.get(&id).copied()
    }

    #[must_use]
    pub fn num_assigned(&self) -> usize {
        self.assignments.len()
    }
}

/// Compiles logical scan requests into one hardware-feasible schedule.
///
/// Stateless between [`update_schedule`](Self::update_schedule) calls except
/// for the published snapshot; the bucket slots and the channel collection
/// are private scratch reused across updates.
#[derive(Debug)]
pub struct Scheduler {
    limits: Limits,
    lattice: PeriodLattice,
    plan: ChannelPlan,
    buckets: BucketList,
    collection: ChannelCollection,
    published: Arc<ScheduleSnapshot>,
}

impl Scheduler {
    /// Build a scheduler. Fails fast on infeasible limits; an initial empty
    /// schedule is published so [`schedule`](Self::schedule) is never empty.
    pub fn new(limits: Limits, lattice: PeriodLattice, plan: ChannelPlan) -> Result<Self> {
        if limits.max_buckets == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "max_buckets must be >= 1",
            )));
        }
        if limits.max_channels == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "max_channels must be >= 1",
            )));
        }
        if limits.max_scans_to_batch == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "max_scans_to_batch must be >= 1",
            )));
        }
        if limits.max_ap_per_scan == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "max_ap_per_scan must be >= 1",
            )));
        }

        let buckets = BucketList::new(lattice.num_slots());
        let mut scheduler = Self {
            limits,
            lattice,
            plan,
            buckets,
            collection: ChannelCollection::new(),
            published: Arc::new(ScheduleSnapshot {
                schedule: HardwareSchedule {
                    base_period_ms: 0,
                    max_ap_per_scan: 0,
                    report_threshold_num_scans: 0,
                    report_threshold_percent: REPORT_THRESHOLD_PERCENT,
                    hidden_network_ids: Vec::new(),
                    buckets: Vec::new(),
                },
                assignments: HashMap::new(),
            }),
        };
        // Publish a valid empty schedule (default period, zero buckets).
        scheduler.update_schedule(&[]);
        Ok(scheduler)
    }

    /// Build a scheduler from a validated configuration file.
    pub fn from_config(cfg: &bgscan_config::Config) -> Result<Self> {
        cfg.validate()?;
        let lattice = PeriodLattice::try_from(&cfg.lattice)?;
        let plan = ChannelPlan::from(&cfg.channel_plan);
        Self::new(Limits::from(&cfg.limits), lattice, plan)
    }

    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    #[must_use]
    pub fn plan(&self) -> &ChannelPlan {
        &self.plan
    }

    /// The currently published schedule. Never empty after construction.
    #[must_use]
    pub fn schedule(&self) -> &HardwareSchedule {
        &self.published.schedule
    }

    /// The published (schedule, map) pair for concurrent readers.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ScheduleSnapshot> {
        Arc::clone(&self.published)
    }

    /// Replace the working set and recompute the schedule from scratch.
    ///
    /// Idempotent: the same request set (by value) compiles to the same
    /// schedule. Requests that cannot be placed are excluded and logged;
    /// the rest of the schedule is still published.
    pub fn update_schedule(&mut self, requests: &[ScanRequest]) {
        self.buckets.clear_all();
        for (index, request) in requests.iter().enumerate() {
            self.place_request(index, request);
        }
        self.compact_buckets(requests);
        self.publish(requests);
    }

    /// Whether `result` should be delivered to `request`'s per-result
    /// ("full") callback. Fails closed for requests not in the live map.
    #[must_use]
    pub fn should_deliver_full_result(
        &self,
        result: &ScanObservation,
        request: &ScanRequest,
    ) -> bool {
        filter::should_deliver_full_result(&self.plan, &self.published, result, request)
    }

    /// Per-request view of a run of raw scans: only covered observations
    /// survive, scans with nothing covered are dropped entirely.
    #[must_use]
    pub fn filter_results_for_request(
        &self,
        batches: &[ScanBatch],
        request: &ScanRequest,
    ) -> Vec<ScanBatch> {
        filter::filter_results_for_request(&self.plan, &self.published, batches, request)
    }

    /// Fold one request into its target slot.
    fn place_request(&mut self, index: usize, request: &ScanRequest) {
        if request.is_backoff() {
            let slot = self.lattice.backoff_index();
            // Period is a placeholder until synthesis re-derives it from the
            // donor's base period.
            let bucket = self.buckets.get_or_create(slot, 0);
            if bucket.backoff_donor.is_none() {
                bucket.backoff_donor = Some(index);
            }
            bucket.members.push(index);
            return;
        }

        match self
            .lattice
            .nearest_regular_index(request.period_ms, self.lattice.num_regular())
        {
            Some(slot) => {
                let period_ms = self.lattice.period(slot);
                self.buckets.get_or_create(slot, period_ms).members.push(index);
            }
            None => {
                // Cannot happen with a non-empty lattice; an internal defect,
                // not a user error. Keep the rest of the schedule intact.
                tracing::error!(
                    request = %request.id,
                    period_ms = request.period_ms,
                    "no lattice slot found for request; excluding it from the schedule"
                );
            }
        }
    }

    /// Reduce the number of distinct periods until the schedule fits the
    /// hardware, starting from the longest-period (least time-sensitive)
    /// buckets and reassigning their requests to the next-closest period.
    fn compact_buckets(&mut self, requests: &[ScanRequest]) {
        let mut budget = self.limits.max_buckets;
        // The back-off slot, when present, consumes one hardware bucket.
        if self.buckets.is_active(self.lattice.backoff_index()) {
            budget -= 1;
        }

        for evicted in (0..self.lattice.num_regular()).rev() {
            if self.buckets.active_regular_count() <= budget {
                break;
            }
            let Some(bucket) = self.buckets.take(evicted) else {
                continue;
            };
            tracing::debug!(
                slot = evicted,
                period_ms = bucket.period_ms,
                members = bucket.members.len(),
                "evicting bucket during compaction"
            );
            for member in bucket.members {
                let request = &requests[member];
                match self.lattice.nearest_regular_index(request.period_ms, evicted) {
                    Some(slot) => {
                        let period_ms = self.lattice.period(slot);
                        self.buckets.get_or_create(slot, period_ms).members.push(member);
                    }
                    None => {
                        tracing::error!(
                            request = %request.id,
                            period_ms = request.period_ms,
                            "no surviving bucket for request during compaction; \
                             excluding it from the schedule"
                        );
                    }
                }
            }
        }
    }

    /// Renumber active buckets densely, synthesize their descriptors and
    /// publish the new (schedule, map) pair as one snapshot.
    fn publish(&mut self, requests: &[ScanRequest]) {
        let mut assignments: HashMap<RequestId, u32> = HashMap::new();
        let mut bucket_specs = Vec::with_capacity(self.buckets.active_count());
        let mut max_ap_per_scan = 0u32;
        let mut report_threshold_num_scans = self.limits.max_scans_to_batch;
        let mut hidden_network_ids: BTreeSet<i32> = BTreeSet::new();

        let mut bucket_id = 0u32;
        for slot in 0..self.buckets.len() {
            let Some(bucket) = self.buckets.get(slot) else {
                continue;
            };
            let spec = synthesize_bucket(
                &mut self.collection,
                &self.plan,
                &self.lattice,
                self.limits.max_channels,
                bucket_id,
                slot,
                bucket,
                requests,
            );

            for &member in &bucket.members {
                let request = &requests[member];
                if assignments.insert(request.id, bucket_id).is_some() {
                    tracing::warn!(
                        request = %request.id,
                        "request id submitted more than once in one update; \
                         the last assignment wins"
                    );
                }
                if request.max_ap_per_scan > max_ap_per_scan {
                    max_ap_per_scan = request.max_ap_per_scan;
                }
                if request.max_scans_to_cache != 0
                    && request.max_scans_to_cache < report_threshold_num_scans
                {
                    report_threshold_num_scans = request.max_scans_to_cache;
                }
                hidden_network_ids.extend(request.hidden_network_ids.iter().copied());
            }

            bucket_specs.push(spec);
            bucket_id += 1;
        }

        if max_ap_per_scan == 0 || max_ap_per_scan > self.limits.max_ap_per_scan {
            max_ap_per_scan = self.limits.max_ap_per_scan;
        }

        let base_period_ms = if bucket_specs.is_empty() {
            self.lattice.default_period_ms()
        } else {
            let mut gcd = bucket_specs[0].period_ms;
            for spec in &bucket_specs[1..] {
                gcd = gcd_u32(gcd, spec.period_ms);
            }
            if gcd < self.lattice.quantum_ms() {
                tracing::error!(gcd, "bucket period gcd below the quantum");
                gcd = self.lattice.quantum_ms();
            }
            gcd
        };

        let schedule = HardwareSchedule {
            base_period_ms,
            max_ap_per_scan,
            report_threshold_num_scans,
            report_threshold_percent: REPORT_THRESHOLD_PERCENT,
            hidden_network_ids: hidden_network_ids.into_iter().collect(),
            buckets: bucket_specs,
        };

        self.published = Arc::new(ScheduleSnapshot {
            schedule,
            assignments,
        });
    }
}

/// Build the descriptor for one bucket: merged report flags, back-off
/// parameters from the donor, and the rendered channel payload.
#[allow(clippy::too_many_arguments)]
fn synthesize_bucket(
    collection: &mut ChannelCollection,
    plan: &ChannelPlan,
    lattice: &PeriodLattice,
    max_channels: usize,
    bucket_id: u32,
    slot: usize,
    bucket: &Bucket,
    requests: &[ScanRequest],
) -> BucketSpec {
    collection.clear();

    // NO_BATCH survives only if every member wants it; the other flags
    // survive if any member wants them.
    let mut report_events = ReportEvents::NO_BATCH;
    for &member in &bucket.members {
        let request = &requests[member];
        if !request.report_events.contains(ReportEvents::NO_BATCH) {
            report_events = report_events.without(ReportEvents::NO_BATCH);
        }
        if request.report_events.contains(ReportEvents::AFTER_EACH_SCAN) {
            report_events |= ReportEvents::AFTER_EACH_SCAN;
        }
        if request.report_events.contains(ReportEvents::FULL_RESULT) {
            report_events |= ReportEvents::FULL_RESULT;
        }
        collection.add_selector(plan, &request.selector);
    }

    let mut period_ms = bucket.period_ms;
    let mut max_period_ms = 0;
    let mut step_count = 0;
    if slot == lattice.backoff_index() {
        if let Some(donor_index) = bucket.backoff_donor {
            let donor = &requests[donor_index];
            // Align the back-off base period with a regular lattice period so
            // it shares wakeups with the rest of the schedule.
            if let Some(index) =
                lattice.nearest_regular_index(donor.period_ms, lattice.num_regular())
            {
                period_ms = lattice.period(index);
            }
            max_period_ms = donor.max_period_ms.max(period_ms);
            step_count = donor.step_count;
        }
    }

    BucketSpec {
        bucket_id,
        period_ms,
        report_events,
        max_period_ms,
        step_count,
        selector: collection.render(max_channels),
    }
}
