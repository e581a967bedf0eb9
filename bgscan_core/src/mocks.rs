//! Test and helper mocks for bgscan_core

use std::collections::VecDeque;

use bgscan_traits::{HardwareSchedule, ScanBatch, ScanDriver};

/// A driver that records every installed schedule and serves pre-queued
/// result batches; useful for exercising the install→scan→attribute flow
/// without hardware.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub installed: Vec<HardwareSchedule>,
    pub stopped: bool,
    queued: VecDeque<Vec<ScanBatch>>,
}

impl RecordingDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one poll's worth of batches.
    pub fn queue_batches(&mut self, batches: Vec<ScanBatch>) {
        self.queued.push_back(batches);
    }

    /// The most recently installed schedule, if any.
    #[must_use]
    pub fn last_installed(&self) -> Option<&HardwareSchedule> {
        self.installed.last()
    }
}

impl ScanDriver for RecordingDriver {
    fn install_schedule(
        &mut self,
        schedule: &HardwareSchedule,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.installed.push(schedule.clone());
        Ok(())
    }

    fn poll_batches(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Vec<ScanBatch>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.queued.pop_front().unwrap_or_default())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.stopped = true;
        Ok(())
    }
}

/// A driver that always errors; useful for exercising install-failure
/// handling on the caller side of the seam.
#[derive(Debug, Default)]
pub struct FailingDriver;

impl ScanDriver for FailingDriver {
    fn install_schedule(
        &mut self,
        _schedule: &HardwareSchedule,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("driver offline")))
    }

    fn poll_batches(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Vec<ScanBatch>, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("timeout waiting for scan")))
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("driver offline")))
    }
}
