//! Result attribution: handing shared physical scan results back to the
//! logical requests that asked for them, without cross-leaking.

use bgscan_traits::{ReportEvents, ScanBatch, ScanObservation};

use crate::channels::ChannelPlan;
use crate::request::ScanRequest;
use crate::scheduler::ScheduleSnapshot;

/// Whether `result` should be delivered to `request`'s full-result callback.
///
/// True iff the request asked for per-result callbacks and its channel
/// selection covers the observed frequency. A request absent from the live
/// map is stale or unscheduled; attribution fails closed.
pub fn should_deliver_full_result(
    plan: &ChannelPlan,
    snapshot: &ScheduleSnapshot,
    result: &ScanObservation,
    request: &ScanRequest,
) -> bool {
    if snapshot.bucket_for(request.id).is_none() {
        tracing::warn!(
            request = %request.id,
            "full-result attribution for a request not in the current schedule"
        );
        return false;
    }
    request.report_events.contains(ReportEvents::FULL_RESULT)
        && plan.covers(&request.selector, result.frequency_mhz)
}

/// Filter a run of raw scans down to what `request` asked for.
///
/// Input ordering and intra-scan ordering are preserved, as are duplicate
/// frequencies within one scan (distinct physical observations). A scan
/// contributing no covered results is dropped from the output entirely.
pub fn filter_results_for_request(
    plan: &ChannelPlan,
    snapshot: &ScheduleSnapshot,
    batches: &[ScanBatch],
    request: &ScanRequest,
) -> Vec<ScanBatch> {
    if snapshot.bucket_for(request.id).is_none() {
        tracing::warn!(
            request = %request.id,
            "batch attribution for a request not in the current schedule"
        );
        return Vec::new();
    }

    let mut filtered = Vec::with_capacity(batches.len());
    for batch in batches {
        let kept: Vec<_> = batch
            .results
            .iter()
            .filter(|r| plan.covers(&request.selector, r.frequency_mhz))
            .copied()
            .collect();
        if kept.len() == batch.results.len() {
            filtered.push(batch.clone());
        } else if !kept.is_empty() {
            filtered.push(ScanBatch {
                scan_id: batch.scan_id,
                bucket_id: batch.bucket_id,
                results: kept,
            });
        }
    }
    filtered
}
