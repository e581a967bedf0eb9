use bgscan_config::load_toml;

#[test]
fn defaults_are_valid() {
    let cfg = load_toml("").expect("parse empty TOML");
    cfg.validate().expect("default config should pass");
    assert_eq!(cfg.limits.max_buckets, 8);
    assert_eq!(cfg.lattice.quantum_ms, 10_000);
    assert_eq!(cfg.lattice.periods_ms.len(), 8);
}

#[test]
fn rejects_zero_max_buckets() {
    let toml = r#"
[limits]
max_buckets = 0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject max_buckets=0");
    assert!(format!("{err}").contains("max_buckets must be >= 1"));
}

#[test]
fn rejects_zero_max_channels() {
    let toml = r#"
[limits]
max_channels = 0
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject max_channels=0");
    assert!(format!("{err}").contains("max_channels must be >= 1"));
}

#[test]
fn rejects_non_power_of_two_lattice_period() {
    // 30000 = 3 * quantum: multiple, but not a power-of-two multiple.
    let toml = r#"
[lattice]
quantum_ms = 10000
default_period_ms = 40000
periods_ms = [40000, 30000]
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject 3x quantum");
    assert!(format!("{err}").contains("power-of-two"));
}

#[test]
fn rejects_period_not_multiple_of_quantum() {
    let toml = r#"
[lattice]
quantum_ms = 10000
periods_ms = [15000]
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject 1.5x quantum");
    assert!(format!("{err}").contains("not a multiple of quantum_ms"));
}

#[test]
fn rejects_empty_lattice() {
    let toml = r#"
[lattice]
periods_ms = []
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject empty lattice");
    assert!(format!("{err}").contains("must not be empty"));
}

#[test]
fn rejects_duplicate_lattice_periods() {
    let toml = r#"
[lattice]
periods_ms = [40000, 20000, 40000]
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject duplicates");
    assert!(format!("{err}").contains("duplicate periods"));
}

#[test]
fn rejects_out_of_band_frequency() {
    let toml = r#"
[channel_plan]
channels_24ghz = [5180]
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("5180 is not a 2.4 GHz channel");
    assert!(format!("{err}").contains("outside 2400..2500"));
}

#[test]
fn rejects_frequency_listed_in_both_5ghz_lists() {
    let toml = r#"
[channel_plan]
channels_5ghz = [5260]
channels_dfs = [5260]
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("5260 cannot be DFS and non-DFS");
    assert!(format!("{err}").contains("both DFS and non-DFS"));
}

#[test]
fn rejects_empty_channel_plan() {
    let toml = r#"
[channel_plan]
channels_24ghz = []
channels_5ghz = []
channels_dfs = []
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("plan with no channels");
    assert!(format!("{err}").contains("at least one channel"));
}

#[test]
fn accepts_custom_two_slot_lattice() {
    let toml = r#"
[limits]
max_buckets = 2

[lattice]
quantum_ms = 10000
default_period_ms = 40000
periods_ms = [40000, 20000]
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
}
