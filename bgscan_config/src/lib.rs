#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the background scan scheduler.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - A channel-plan CSV loader ingests per-regulatory-domain frequency
//!   tables with enforced headers and per-band range checks.
use serde::Deserialize;

/// Hardware capacity limits the compiled schedule must respect.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct Limits {
    /// Number of simultaneously scheduled buckets the chip supports.
    pub max_buckets: usize,
    /// Longest explicit channel list a single bucket may carry.
    pub max_channels: usize,
    /// Scans firmware may buffer before forcing delivery.
    /// Anecdotally some chipsets fail without explanation above 10.
    pub max_scans_to_batch: u32,
    /// Cap on access points reported per physical scan.
    pub max_ap_per_scan: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_buckets: 8,
            max_channels: 32,
            max_scans_to_batch: 10,
            max_ap_per_scan: 32,
        }
    }
}

/// The predefined periods buckets may be scheduled at.
///
/// `periods_ms` is in preference order, not sorted order: when compaction
/// runs out of hardware slots, demand is reassigned toward the front of the
/// list. Every entry must be `2^N * quantum_ms` so that requests with
/// intersecting channels collapse onto aligned wakeups instead of
/// scattering extra scans across the hour.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LatticeCfg {
    /// Value all bucket periods are an integer multiple of (ms).
    pub quantum_ms: u32,
    /// Period published when no buckets are scheduled (ms).
    pub default_period_ms: u32,
    /// Allowed regular bucket periods (ms), preference-ordered.
    pub periods_ms: Vec<u32>,
}

impl Default for LatticeCfg {
    fn default() -> Self {
        Self {
            quantum_ms: 10_000,
            default_period_ms: 40_000,
            periods_ms: vec![
                40_000,    // 40s
                20_000,    // 20s
                160_000,   // 160s
                320_000,   // 320s
                10_000,    // 10s
                1_280_000, // ~21min
                640_000,   // ~11min
                2_560_000, // ~43min
            ],
        }
    }
}

/// Static channel plan: which frequencies exist per band on this hardware.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChannelPlanCfg {
    /// 2.4 GHz channel center frequencies (MHz).
    pub channels_24ghz: Vec<u32>,
    /// Non-DFS 5 GHz channel center frequencies (MHz).
    pub channels_5ghz: Vec<u32>,
    /// DFS channel center frequencies (MHz).
    pub channels_dfs: Vec<u32>,
}

impl Default for ChannelPlanCfg {
    fn default() -> Self {
        // US regulatory domain.
        Self {
            channels_24ghz: vec![
                2412, 2417, 2422, 2427, 2432, 2437, 2442, 2447, 2452, 2457, 2462,
            ],
            channels_5ghz: vec![5180, 5200, 5220, 5240, 5745, 5765, 5785, 5805, 5825],
            channels_dfs: vec![
                5260, 5280, 5300, 5320, 5500, 5520, 5540, 5560, 5580, 5600, 5620, 5640,
                5660, 5680, 5700,
            ],
        }
    }
}

/// Top-level scheduler configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    pub lattice: LatticeCfg,
    pub channel_plan: ChannelPlanCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Limits
        if self.limits.max_buckets == 0 {
            eyre::bail!("limits.max_buckets must be >= 1");
        }
        if self.limits.max_buckets > 64 {
            eyre::bail!("limits.max_buckets is unreasonably large (>64)");
        }
        if self.limits.max_channels == 0 {
            eyre::bail!("limits.max_channels must be >= 1");
        }
        if self.limits.max_scans_to_batch == 0 {
            eyre::bail!("limits.max_scans_to_batch must be >= 1");
        }
        if self.limits.max_ap_per_scan == 0 {
            eyre::bail!("limits.max_ap_per_scan must be >= 1");
        }

        // Lattice
        if self.lattice.quantum_ms == 0 {
            eyre::bail!("lattice.quantum_ms must be >= 1");
        }
        if self.lattice.periods_ms.is_empty() {
            eyre::bail!("lattice.periods_ms must not be empty");
        }
        for &p in &self.lattice.periods_ms {
            if p == 0 || p % self.lattice.quantum_ms != 0 {
                eyre::bail!("lattice period {p} is not a multiple of quantum_ms");
            }
            let factor = p / self.lattice.quantum_ms;
            if !factor.is_power_of_two() {
                eyre::bail!("lattice period {p} is not a power-of-two multiple of quantum_ms");
            }
        }
        let mut seen = self.lattice.periods_ms.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.lattice.periods_ms.len() {
            eyre::bail!("lattice.periods_ms contains duplicate periods");
        }
        if self.lattice.default_period_ms == 0
            || self.lattice.default_period_ms % self.lattice.quantum_ms != 0
        {
            eyre::bail!("lattice.default_period_ms must be a multiple of quantum_ms");
        }

        // Channel plan
        let plan = &self.channel_plan;
        if plan.channels_24ghz.is_empty()
            && plan.channels_5ghz.is_empty()
            && plan.channels_dfs.is_empty()
        {
            eyre::bail!("channel_plan must list at least one channel");
        }
        for &f in &plan.channels_24ghz {
            if !(2400..2500).contains(&f) {
                eyre::bail!("channel_plan.channels_24ghz frequency {f} outside 2400..2500 MHz");
            }
        }
        for &f in plan.channels_5ghz.iter().chain(&plan.channels_dfs) {
            if !(5100..6000).contains(&f) {
                eyre::bail!("channel_plan 5 GHz frequency {f} outside 5100..6000 MHz");
            }
        }
        for list in [&plan.channels_24ghz, &plan.channels_5ghz, &plan.channels_dfs] {
            let mut sorted = list.clone();
            sorted.sort_unstable();
            sorted.dedup();
            if sorted.len() != list.len() {
                eyre::bail!("channel_plan lists must not contain duplicate frequencies");
            }
        }
        if let Some(f) = plan
            .channels_dfs
            .iter()
            .find(|f| plan.channels_5ghz.contains(*f))
        {
            eyre::bail!("frequency {f} listed as both DFS and non-DFS 5 GHz");
        }

        Ok(())
    }
}

/// Channel-plan CSV schema.
///
/// Expected headers:
/// frequency_mhz,band
///
/// Example:
/// frequency_mhz,band
/// 2412,2.4ghz
/// 5260,dfs
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelPlanRow {
    pub frequency_mhz: u32,
    pub band: String,
}

/// Load a channel plan from a CSV frequency table.
///
/// Band labels are `2.4ghz`, `5ghz` and `dfs` (case-insensitive). The
/// resulting plan is range- and duplicate-checked like the TOML variant.
pub fn load_channel_plan_csv(path: &std::path::Path) -> eyre::Result<ChannelPlanCfg> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open channel plan CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["frequency_mhz", "band"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "channel plan CSV must have headers 'frequency_mhz,band', got: {}",
            actual.join(",")
        );
    }

    let mut plan = ChannelPlanCfg {
        channels_24ghz: Vec::new(),
        channels_5ghz: Vec::new(),
        channels_dfs: Vec::new(),
    };
    for (idx, rec) in rdr.deserialize::<ChannelPlanRow>().enumerate() {
        let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
        match row.band.to_lowercase().as_str() {
            "2.4ghz" => plan.channels_24ghz.push(row.frequency_mhz),
            "5ghz" => plan.channels_5ghz.push(row.frequency_mhz),
            "dfs" => plan.channels_dfs.push(row.frequency_mhz),
            other => {
                eyre::bail!(
                    "CSV row {}: unknown band '{}' (expected 2.4ghz, 5ghz or dfs)",
                    idx + 2,
                    other
                );
            }
        }
    }

    // Reuse the TOML validation for ranges and duplicates.
    let cfg = Config {
        channel_plan: plan,
        ..Config::default()
    };
    cfg.validate()?;
    Ok(cfg.channel_plan)
}
