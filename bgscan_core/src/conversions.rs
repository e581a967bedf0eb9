//! `From` implementations bridging `bgscan_config` types to `bgscan_core` types.

use crate::bucket::PeriodLattice;
use crate::channels::ChannelPlan;
use crate::scheduler::Limits;

// ── Limits ───────────────────────────────────────────────────────────────────

impl From<&bgscan_config::Limits> for Limits {
    fn from(c: &bgscan_config::Limits) -> Self {
        Self {
            max_buckets: c.max_buckets,
            max_channels: c.max_channels,
            max_scans_to_batch: c.max_scans_to_batch,
            max_ap_per_scan: c.max_ap_per_scan,
        }
    }
}

// ── PeriodLattice ────────────────────────────────────────────────────────────

impl TryFrom<&bgscan_config::LatticeCfg> for PeriodLattice {
    type Error = crate::error::Report;

    fn try_from(c: &bgscan_config::LatticeCfg) -> Result<Self, Self::Error> {
        Self::new(c.periods_ms.clone(), c.quantum_ms, c.default_period_ms)
    }
}

// ── ChannelPlan ──────────────────────────────────────────────────────────────

impl From<&bgscan_config::ChannelPlanCfg> for ChannelPlan {
    fn from(c: &bgscan_config::ChannelPlanCfg) -> Self {
        Self::new(
            c.channels_24ghz.clone(),
            c.channels_5ghz.clone(),
            c.channels_dfs.clone(),
        )
    }
}
