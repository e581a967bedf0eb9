//! End-to-end flow: compile a schedule, install it through the driver seam,
//! pump tagged results back and attribute them per request.

use std::time::Duration;

use bgscan_core::error::{ScanError, map_driver_error};
use bgscan_core::mocks::{FailingDriver, RecordingDriver};
use bgscan_core::{
    BandSet, ChannelSelector, ReportEvents, RequestId, ScanBatch, ScanDriver, ScanObservation,
    ScanRequest, Scheduler,
};

#[test]
fn schedule_flows_through_driver_and_back() {
    let mut scheduler =
        Scheduler::from_config(&bgscan_config::Config::default()).expect("build scheduler");

    let mut wants_24ghz = ScanRequest::new(
        RequestId(1),
        ChannelSelector::Bands(BandSet::BAND_24_GHZ),
        20_000,
    );
    wants_24ghz.report_events = ReportEvents::FULL_RESULT;
    let wants_5ghz = ScanRequest::new(
        RequestId(2),
        ChannelSelector::Channels(vec![5180, 5200]),
        20_000,
    );
    scheduler.update_schedule(&[wants_24ghz.clone(), wants_5ghz.clone()]);

    // Install into the (mock) radio.
    let mut driver = RecordingDriver::new();
    driver
        .install_schedule(scheduler.schedule())
        .expect("install");
    let installed = driver.last_installed().expect("schedule recorded");
    assert_eq!(installed, scheduler.schedule());
    assert_eq!(installed.buckets.len(), 1);

    // The radio executes the shared bucket and reports mixed results.
    let bucket_id = installed.buckets[0].bucket_id;
    driver.queue_batches(vec![ScanBatch {
        scan_id: 1,
        bucket_id,
        results: vec![
            ScanObservation::on_frequency(2412),
            ScanObservation::on_frequency(5180),
            ScanObservation::on_frequency(2437),
        ],
    }]);
    let batches = driver.poll_batches(Duration::from_millis(100)).expect("poll");
    assert_eq!(batches.len(), 1);

    // Each requester sees only its own slice of the shared scan.
    let for_24ghz = scheduler.filter_results_for_request(&batches, &wants_24ghz);
    assert_eq!(
        for_24ghz[0]
            .results
            .iter()
            .map(|r| r.frequency_mhz)
            .collect::<Vec<_>>(),
        vec![2412, 2437]
    );
    let for_5ghz = scheduler.filter_results_for_request(&batches, &wants_5ghz);
    assert_eq!(
        for_5ghz[0]
            .results
            .iter()
            .map(|r| r.frequency_mhz)
            .collect::<Vec<_>>(),
        vec![5180]
    );

    // Full-result gating: only the 2.4 GHz requester asked for callbacks.
    let obs = ScanObservation::on_frequency(2412);
    assert!(scheduler.should_deliver_full_result(&obs, &wants_24ghz));
    assert!(!scheduler.should_deliver_full_result(&obs, &wants_5ghz));

    driver.stop().expect("stop");
    assert!(driver.stopped);
}

#[test]
fn reinstall_after_update_reflects_the_new_working_set() {
    let mut scheduler =
        Scheduler::from_config(&bgscan_config::Config::default()).expect("build scheduler");
    let mut driver = RecordingDriver::new();

    let first = ScanRequest::new(RequestId(1), ChannelSelector::Channels(vec![2412]), 20_000);
    scheduler.update_schedule(std::slice::from_ref(&first));
    driver
        .install_schedule(scheduler.schedule())
        .expect("install");

    // Dropping the request from the next update empties the schedule.
    scheduler.update_schedule(&[]);
    driver
        .install_schedule(scheduler.schedule())
        .expect("reinstall");

    assert_eq!(driver.installed.len(), 2);
    assert_eq!(driver.installed[0].buckets.len(), 1);
    assert!(driver.installed[1].buckets.is_empty());
    assert_eq!(driver.installed[1].base_period_ms, 40_000);
}

#[test]
fn driver_errors_map_to_typed_scan_errors() {
    let scheduler =
        Scheduler::from_config(&bgscan_config::Config::default()).expect("build scheduler");
    let mut driver = FailingDriver;

    let err = driver
        .install_schedule(scheduler.schedule())
        .expect_err("driver offline");
    assert!(matches!(
        map_driver_error(&*err),
        ScanError::Driver(_)
    ));

    let err = driver
        .poll_batches(Duration::from_millis(10))
        .expect_err("poll fails");
    assert!(matches!(map_driver_error(&*err), ScanError::Timeout));
}
