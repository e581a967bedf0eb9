#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Background scan scheduling (hardware-agnostic).
//!
//! This crate compiles an arbitrary set of periodic scan requests into one
//! hardware-feasible schedule and attributes shared physical results back to
//! the requests that asked for them. All hardware interaction goes through
//! the `bgscan_traits::ScanDriver` trait.
//!
//! ## Architecture
//!
//! - **Requests**: client scan intents with period, channel selection and
//!   reporting preferences (`request` module)
//! - **Channels**: per-hardware channel plan and the merge/render
//!   accumulator (`channels` module)
//! - **Buckets**: the predefined period lattice and its slot bookkeeping
//!   (`bucket` module)
//! - **Scheduling**: assignment, compaction and descriptor synthesis
//!   (`scheduler` module)
//! - **Attribution**: per-request result filtering (`filter` module)
//!
//! ## Scheduling model
//!
//! Scan periods are quantized onto a small predefined lattice (power-of-two
//! multiples of a base quantum) so that requests with intersecting channels
//! share wakeups instead of multiplying them. When demand exceeds the
//! hardware bucket budget, the longest-period buckets are folded into the
//! next-closest surviving period.

// Module declarations
pub mod bucket;
pub mod channels;
pub mod conversions;
pub mod error;
pub mod filter;
pub mod mocks;
pub mod request;
pub mod scheduler;
pub mod util;

pub use bucket::PeriodLattice;
pub use channels::{ChannelCollection, ChannelPlan};
pub use error::{BuildError, Result, ScanError};
pub use request::{RequestId, ScanRequest};
pub use scheduler::{Limits, ScheduleSnapshot, Scheduler};

// Re-export the wire types callers need alongside the scheduler.
pub use bgscan_traits::{
    BandSet, BucketSpec, ChannelSelector, HardwareSchedule, ReportEvents, ScanBatch,
    ScanDriver, ScanObservation,
};
