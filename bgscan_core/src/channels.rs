//! Channel-plan resolution and channel accumulation.
//!
//! `ChannelPlan` knows which frequencies exist per band on this hardware and
//! answers band-membership questions; `ChannelCollection` merges the channel
//! demands of many requests and renders them back into the smallest
//! hardware-representable form.

use std::collections::BTreeSet;

use bgscan_traits::{BandSet, ChannelSelector};

/// Static per-hardware channel plan.
#[derive(Debug, Clone)]
pub struct ChannelPlan {
    channels_24ghz: Vec<u32>,
    channels_5ghz: Vec<u32>,
    channels_dfs: Vec<u32>,
}

impl ChannelPlan {
    #[must_use]
    pub fn new(channels_24ghz: Vec<u32>, channels_5ghz: Vec<u32>, channels_dfs: Vec<u32>) -> Self {
        Self {
            channels_24ghz,
            channels_5ghz,
            channels_dfs,
        }
    }

    /// The band a frequency nominally belongs to, or `NONE` if the
    /// frequency is outside every known range.
    ///
    /// DFS membership is decided by the plan's DFS list before the generic
    /// 5 GHz range check, so DFS frequencies never resolve as plain 5 GHz.
    #[must_use]
    pub fn band_of(&self, frequency_mhz: u32) -> BandSet {
        if (2400..2500).contains(&frequency_mhz) {
            BandSet::BAND_24_GHZ
        } else if self.channels_dfs.contains(&frequency_mhz) {
            BandSet::BAND_5_GHZ_DFS_ONLY
        } else if (5100..6000).contains(&frequency_mhz) {
            BandSet::BAND_5_GHZ
        } else {
            BandSet::NONE
        }
    }

    /// All frequencies belonging to the given bands, in plan order.
    #[must_use]
    pub fn channels_in(&self, bands: BandSet) -> Vec<u32> {
        let mut out = Vec::new();
        if bands.contains(BandSet::BAND_24_GHZ) {
            out.extend_from_slice(&self.channels_24ghz);
        }
        if bands.contains(BandSet::BAND_5_GHZ) {
            out.extend_from_slice(&self.channels_5ghz);
        }
        if bands.contains(BandSet::BAND_5_GHZ_DFS_ONLY) {
            out.extend_from_slice(&self.channels_dfs);
        }
        out
    }

    /// Whether a request's channel selection covers the given frequency.
    #[must_use]
    pub fn covers(&self, selector: &ChannelSelector, frequency_mhz: u32) -> bool {
        match selector {
            ChannelSelector::Channels(list) => list.contains(&frequency_mhz),
            ChannelSelector::Bands(bands) => bands.intersects(self.band_of(frequency_mhz)),
        }
    }
}

impl Default for ChannelPlan {
    fn default() -> Self {
        Self::from(&bgscan_config::ChannelPlanCfg::default())
    }
}

/// Accumulator merging the channels and bands of multiple requests.
///
/// Tracks two band masks: `exact_bands` is what whole-band adds asked for,
/// `all_bands` additionally includes the nominal band of every one-off
/// channel. When the two agree, every accumulated channel came from
/// whole-band adds and the set can be represented as a band mask.
#[derive(Debug, Default)]
pub struct ChannelCollection {
    channels: BTreeSet<u32>,
    exact_bands: BandSet,
    all_bands: BandSet,
}

impl ChannelCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_channel(&mut self, plan: &ChannelPlan, frequency_mhz: u32) {
        self.channels.insert(frequency_mhz);
        self.all_bands |= plan.band_of(frequency_mhz);
    }

    pub fn add_band(&mut self, plan: &ChannelPlan, bands: BandSet) {
        self.exact_bands |= bands;
        self.all_bands |= bands;
        for frequency in plan.channels_in(bands) {
            self.channels.insert(frequency);
        }
    }

    pub fn add_selector(&mut self, plan: &ChannelPlan, selector: &ChannelSelector) {
        match selector {
            ChannelSelector::Channels(list) => {
                for &frequency in list {
                    self.add_channel(plan, frequency);
                }
            }
            ChannelSelector::Bands(bands) => self.add_band(plan, *bands),
        }
    }

    pub fn clear(&mut self) {
        self.channels.clear();
        self.exact_bands = BandSet::NONE;
        self.all_bands = BandSet::NONE;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() && self.all_bands.is_empty()
    }

    /// Render the accumulated set into its hardware form.
    ///
    /// A band mask is emitted when the explicit list would exceed
    /// `max_channels`, or when every channel present came from whole-band
    /// adds (`all_bands == exact_bands`) and at least one band was added.
    /// Otherwise the deduplicated explicit list wins, preserving exact
    /// behavior for callers that asked for discrete channels.
    #[must_use]
    pub fn render(&self, max_channels: usize) -> ChannelSelector {
        if (self.channels.len() > max_channels || self.all_bands == self.exact_bands)
            && !self.all_bands.is_empty()
        {
            ChannelSelector::Bands(self.all_bands)
        } else {
            ChannelSelector::Channels(self.channels.iter().copied().collect())
        }
    }
}
