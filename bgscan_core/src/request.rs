//! Client-side scan requests.

use std::fmt;

use bgscan_traits::{ChannelSelector, ReportEvents};

/// Opaque handle identifying one logical scan request across updates.
///
/// Stands in for object identity: a client keeps the id it submitted and
/// uses the same id when asking for result attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// One logical periodic scan request, immutable once submitted.
///
/// A request is an exponential back-off request when `max_period_ms` is
/// nonzero and differs from `period_ms`; its effective period then lengthens
/// geometrically from `period_ms` toward `max_period_ms` over `step_count`
/// steps, and it is served from a dedicated bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub id: RequestId,
    /// Bands or explicit frequencies to scan.
    pub selector: ChannelSelector,
    /// Requested repeat interval (ms).
    pub period_ms: u32,
    /// Back-off ceiling (ms); 0 for plain periodic requests.
    pub max_period_ms: u32,
    /// Back-off step count; meaningful only for back-off requests.
    pub step_count: u32,
    pub report_events: ReportEvents,
    /// Desired cap on results per physical scan; 0 = no preference.
    pub max_ap_per_scan: u32,
    /// Batching depth before forced delivery; 0 = use the hardware default.
    pub max_scans_to_cache: u32,
    /// Network ids that must be actively probed.
    pub hidden_network_ids: Vec<i32>,
}

impl ScanRequest {
    /// A plain periodic request with no reporting or batching preferences.
    #[must_use]
    pub fn new(id: RequestId, selector: ChannelSelector, period_ms: u32) -> Self {
        Self {
            id,
            selector,
            period_ms,
            max_period_ms: 0,
            step_count: 0,
            report_events: ReportEvents::empty(),
            max_ap_per_scan: 0,
            max_scans_to_cache: 0,
            hidden_network_ids: Vec::new(),
        }
    }

    /// True when this request wants exponential back-off scanning.
    #[must_use]
    pub fn is_backoff(&self) -> bool {
        self.max_period_ms != 0 && self.max_period_ms != self.period_ms
    }
}
