//! End-to-end tests running the `acplog` binary against log files on disk.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn acplog_binary() -> String {
    env!("CARGO_BIN_EXE_acplog").to_string()
}

fn acplog(home: &Path, args: &[&str]) -> Output {
    Command::new(acplog_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run acplog")
}

const FIRST_NIGHT: &str = "\
ACP Console log opened 01-Jan-2020 20:00:00
# Session for M42
20:00:01 Starting target: M42
20:00:05 Start slew to M42
20:00:35 Slew complete
20:00:36 Updating pointing...
20:00:37 (taking 15 sec. exposure, Luminance filter, binning = 2)
20:01:00 Solved! 120 stars matched
20:01:01 Pointing error is 2.31 arcmin @ angle 146.33
20:01:40 Target is now centered.
20:02:00 Imaging to M42-001
20:02:01 (taking 600 sec. exposure, Red filter, binning = 1)
20:12:05 Image FWHM is 2.80 arcsec (1.4 pixels)
ACP Console log closed 01-Jan-2020 21:00:00
";

const SECOND_NIGHT: &str = "\
ACP Console log opened 02-Jan-2020 23:30:00
23:30:01 Starting target: M31
23:40:00 Wait until 23:50:00
23:50:00 Wait finished
23:55:00 Imaging to M31-001
23:55:01 (taking 900 sec. exposure, Ha filter, binning = 1)
00:10:05 Image FWHM is 3.20 arcsec (1.6 pixels)
ACP Console log closed 03-Jan-2020 00:30:00
";

fn write_logs(dir: &Path) {
    std::fs::write(dir.join("2020-01-01.log"), FIRST_NIGHT).unwrap();
    std::fs::write(dir.join("2020-01-02.log"), SECOND_NIGHT).unwrap();
    std::fs::write(dir.join("notes.txt"), "not a log").unwrap();
}

#[test]
fn test_summary_over_directory() {
    let temp = TempDir::new().unwrap();
    let logs = temp.path().join("logs");
    std::fs::create_dir(&logs).unwrap();
    write_logs(&logs);

    let output = acplog(temp.path(), &["summary", "--json", logs.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "acplog summary should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let collection = &json["collection"];

    assert_eq!(json["logs"].as_array().unwrap().len(), 2);
    assert_eq!(collection["log_count"], 2);
    assert_eq!(collection["unique_targets"], serde_json::json!(["M31", "M42"]));
    assert_eq!(collection["total_log_run_time"], 7200.0);
    assert_eq!(collection["total_imaging_time"], 1500.0);
    assert_eq!(collection["total_wait_time"], 600.0);
    assert_eq!(collection["average_fwhm"], 3.0);
    assert_eq!(collection["plate_solve"]["successes"], 1);
}

#[test]
fn test_summary_uses_configured_directory() {
    let temp = TempDir::new().unwrap();
    let logs = temp.path().join("observatory");
    std::fs::create_dir(&logs).unwrap();
    write_logs(&logs);

    let config = temp.path().join("acplog.toml");
    std::fs::write(&config, format!("logs_dir = {:?}\n", logs.to_str().unwrap())).unwrap();

    let output = acplog(
        temp.path(),
        &["--config", config.to_str().unwrap(), "summary"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Logs:            2"));
    assert!(stdout.contains("Unique targets:  2"));
}

#[test]
fn test_events_for_one_log() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());
    let log = temp.path().join("2020-01-01.log");

    let output = acplog(
        temp.path(),
        &["events", log.to_str().unwrap(), "--kind", "pointing_error_object_slew", "--json"],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = json.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["payload"]["value"], 2.31);
    assert_eq!(events[0]["target"], 0);
}

#[test]
fn test_targets_for_one_log() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());
    let log = temp.path().join("2020-01-02.log");

    let output = acplog(temp.path(), &["targets", log.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("M31\n"));
    assert!(stdout.contains("1 × 900s Ha bin 1"));
}

#[test]
fn test_non_log_file_fails() {
    let temp = TempDir::new().unwrap();
    write_logs(temp.path());

    let output = acplog(
        temp.path(),
        &["events", temp.path().join("notes.txt").to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not an ACP log"));
}
