use std::fs::File;
use std::io::Write;

use bgscan_config::load_channel_plan_csv;
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("plan.csv");
    let mut f = File::create(&path).expect("create csv");
    f.write_all(contents.as_bytes()).expect("write csv");
    (dir, path)
}

#[rstest]
fn loads_mixed_band_plan() {
    let (_dir, path) = write_csv(
        "frequency_mhz,band\n\
         2412,2.4ghz\n\
         2437,2.4ghz\n\
         5180,5ghz\n\
         5260,dfs\n",
    );
    let plan = load_channel_plan_csv(&path).expect("load plan");
    assert_eq!(plan.channels_24ghz, vec![2412, 2437]);
    assert_eq!(plan.channels_5ghz, vec![5180]);
    assert_eq!(plan.channels_dfs, vec![5260]);
}

#[rstest]
fn band_labels_are_case_insensitive() {
    let (_dir, path) = write_csv(
        "frequency_mhz,band\n\
         2412,2.4GHz\n\
         5500,DFS\n",
    );
    let plan = load_channel_plan_csv(&path).expect("load plan");
    assert_eq!(plan.channels_24ghz, vec![2412]);
    assert_eq!(plan.channels_dfs, vec![5500]);
}

#[rstest]
fn rejects_wrong_headers() {
    let (_dir, path) = write_csv("freq,band\n2412,2.4ghz\n");
    let err = load_channel_plan_csv(&path).expect_err("headers must match");
    assert!(format!("{err}").contains("frequency_mhz,band"));
}

#[rstest]
fn rejects_unknown_band_label() {
    let (_dir, path) = write_csv("frequency_mhz,band\n2412,6ghz\n");
    let err = load_channel_plan_csv(&path).expect_err("unknown band");
    assert!(format!("{err}").contains("unknown band '6ghz'"));
}

#[rstest]
fn rejects_out_of_range_frequency() {
    let (_dir, path) = write_csv("frequency_mhz,band\n2412,5ghz\n");
    let err = load_channel_plan_csv(&path).expect_err("2412 is not 5 GHz");
    assert!(format!("{err}").contains("outside 5100..6000"));
}

#[rstest]
fn rejects_duplicate_frequency() {
    let (_dir, path) = write_csv(
        "frequency_mhz,band\n\
         2412,2.4ghz\n\
         2412,2.4ghz\n",
    );
    let err = load_channel_plan_csv(&path).expect_err("duplicate frequency");
    assert!(format!("{err}").contains("duplicate"));
}

#[rstest]
fn rejects_malformed_row() {
    let (_dir, path) = write_csv("frequency_mhz,band\nnot_a_number,2.4ghz\n");
    let err = load_channel_plan_csv(&path).expect_err("bad frequency cell");
    assert!(format!("{err}").contains("invalid CSV row 2"));
}
