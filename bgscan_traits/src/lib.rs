pub mod channels;
pub mod results;
pub mod schedule;

pub use channels::{BandSet, ChannelSelector};
pub use results::{ScanBatch, ScanObservation};
pub use schedule::{BucketSpec, HardwareSchedule, ReportEvents};

/// Seam to the physical scan driver. The scheduler only produces a
/// [`HardwareSchedule`]; installing it and pumping results back is the
/// driver's job. Install failures (and any retry policy) stay on this side
/// of the boundary.
pub trait ScanDriver {
    /// Replace the currently installed schedule.
    fn install_schedule(
        &mut self,
        schedule: &HardwareSchedule,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Block up to `timeout` for the next completed scans.
    fn poll_batches(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Vec<ScanBatch>, Box<dyn std::error::Error + Send + Sync>>;

    /// Stop scanning and discard the installed schedule.
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
