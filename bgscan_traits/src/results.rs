//! Raw scan observations as delivered by the driver.

/// One access point observed during a physical scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanObservation {
    /// Channel center frequency in MHz.
    pub frequency_mhz: u32,
    /// Received signal strength in dBm.
    pub rssi_dbm: i32,
    /// BSSID of the observed network.
    pub bssid: [u8; 6],
}

impl ScanObservation {
    /// Convenience constructor for tests and adapters that only care about
    /// the frequency.
    #[must_use]
    pub const fn on_frequency(frequency_mhz: u32) -> Self {
        Self {
            frequency_mhz,
            rssi_dbm: 0,
            bssid: [0; 6],
        }
    }
}

/// Results of one physical scan, tagged with the bucket that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanBatch {
    /// Monotonic id assigned by the driver.
    pub scan_id: u32,
    /// The dense bucket id this scan was executed for.
    pub bucket_id: u32,
    /// Observations in the order the radio reported them. Duplicate
    /// frequencies are distinct physical observations and are kept.
    pub results: Vec<ScanObservation>,
}
