use std::io::Write;
use std::process::{Command, Stdio};

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sales-activity"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn calculate_prints_default_targets() {
    let output = binary().arg("calculate").output().expect("run calculate");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Daily Requirements (100%)"));
    assert!(stdout.contains("Connected Calls: 7"));
    assert!(stdout.contains("Emails: 134"));
    assert!(stdout.contains("Required Booked Meetings: 28"));
}

#[test]
fn calculate_json_applies_field_flags() {
    let output = binary()
        .args(["calculate", "--format", "json", "--cw-mrr", "2520", "--email-to-meeting", "abc"])
        .output()
        .expect("run calculate");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(value["quotas"]["cwMrrTarget"], serde_json::json!(2520.0));
    assert_eq!(value["rates"]["emailToMeetingRate"], serde_json::json!(0.0));
    assert_eq!(value["metrics"]["monthly"]["deals"], serde_json::json!(34.0));
    assert_eq!(value["metrics"]["daily"]["emails"], serde_json::json!("Infinity"));
    assert_eq!(value["breakdown"]["requiredEmails"], serde_json::json!("Infinity"));
}

#[test]
fn scenario_file_seeds_inputs() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("temp scenario");
    writeln!(file, "quotas:\n  cwMrrTarget: 2520\nrates:\n  connectedToMeetingRate: 40").expect("write scenario");

    let output = binary()
        .arg("charts")
        .arg("--scenario")
        .arg(file.path())
        .output()
        .expect("run charts");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let stages = value["funnel"]["stages"].as_array().expect("stages");
    assert_eq!(stages[0]["name"], "Connected Calls");
    assert_eq!(stages[3]["value"], serde_json::json!(34.0));
    assert_eq!(value["quotaComposition"]["slices"][0]["value"], serde_json::json!(50.0));
}

#[test]
fn invalid_scenario_exits_with_usage_code() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().expect("temp scenario");
    write!(file, r#"{{"rates":{{"churn":1}}}}"#).expect("write scenario");

    let output = binary()
        .arg("calculate")
        .arg("--scenario")
        .arg(file.path())
        .output()
        .expect("run calculate");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("CONFIG_INVALID"));
}

#[test]
fn interactive_session_reads_stdin() {
    let mut child = binary()
        .arg("interactive")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn interactive");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"set avg-deal-size 298\nshow\nquit\n")
        .expect("write commands");
    let output = child.wait_with_output().expect("wait interactive");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("avgDealSize = 298"));
    assert!(stdout.contains("Required MRR Deals: 9"));
}
