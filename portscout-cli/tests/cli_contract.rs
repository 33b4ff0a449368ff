//! Integration tests for core CLI contract behavior.

use {
    predicates::prelude::*,
    std::{fs, path::Path},
    tempfile::tempdir,
};

fn cli_cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("portscout")
}

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("portscout.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn help_exits_zero_and_writes_stdout_only() {
    let mut cmd = cli_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("portscout"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn version_exits_zero_and_writes_stdout_only() {
    let mut cmd = cli_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("portscout"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let mut cmd = cli_cmd();
    cmd.arg("definitely-not-a-command")
        .assert()
        .code(2);
}

#[test]
fn list_json_with_everything_blacklisted_is_empty() {
    let dir = tempdir().expect("tempdir should be created");
    let config = write_config(
        dir.path(),
        r#"
[serial]
blacklisted_ports = ["*"]
"#,
    );

    let output = cli_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--json"])
        .output()
        .expect("command should execute");

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(parsed["ok"], serde_json::Value::Bool(true));
    assert_eq!(parsed["data"]["ports"], serde_json::json!([]));
    assert!(parsed["data"]["preferred"].is_null());
}

#[cfg(unix)]
#[test]
fn list_json_orders_preferred_port_first() {
    let dir = tempdir().expect("tempdir should be created");
    for name in ["ttyS0", "ttyS1", "ttyS2"] {
        fs::write(dir.path().join(name), b"").expect("write fake device");
    }
    let base = dir.path().display().to_string();
    let config = write_config(
        dir.path(),
        &format!(
            r#"
[serial]
port = "{base}/ttyS1"
additional_ports = ["{base}/ttyS*"]
blacklisted_ports = ["/dev/*", "*/ttyS2"]
"#
        ),
    );

    let output = cli_cmd()
        .arg("--config")
        .arg(&config)
        .args(["list", "--json"])
        .output()
        .expect("command should execute");

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(
        parsed["data"]["ports"],
        serde_json::json!([format!("{base}/ttyS1"), format!("{base}/ttyS0")])
    );
    assert_eq!(
        parsed["data"]["preferred"],
        serde_json::json!(format!("{base}/ttyS1"))
    );
}

#[test]
fn blacklist_flag_extends_config() {
    let dir = tempdir().expect("tempdir should be created");
    let config = write_config(dir.path(), "");

    let output = cli_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--blacklist", "*", "list", "--json"])
        .output()
        .expect("command should execute");

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(parsed["data"]["ports"], serde_json::json!([]));
}

#[test]
fn connect_without_candidates_is_usage_error() {
    let dir = tempdir().expect("tempdir should be created");
    let config = write_config(
        dir.path(),
        r#"
[serial]
blacklisted_ports = ["*"]
"#,
    );

    cli_cmd()
        .arg("--config")
        .arg(&config)
        .arg("connect")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No serial port candidates"));
}

#[cfg(unix)]
#[test]
fn connect_through_bridge_remembers_port() {
    let dir = tempdir().expect("tempdir should be created");
    let input = dir.path().join("input");
    let output_file = dir.path().join("output");
    fs::write(&input, b"").expect("write bridge input");

    let config = write_config(
        dir.path(),
        &format!(
            r#"
[serial]
blacklisted_ports = ["/dev/*"]

[bridge]
label = "BRIDGE"
input = "{}"
output = "{}"
"#,
            input.display(),
            output_file.display()
        ),
    );

    cli_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--baud", "250000", "connect", "--remember"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BRIDGE"));

    assert_eq!(
        fs::read_to_string(&output_file).expect("read bridge output"),
        "!octo4a: BAUDRATE250000\n!octo4a: CLOSE\n"
    );

    let saved = fs::read_to_string(&config).expect("read config");
    assert!(saved.contains("port = \"BRIDGE\""));
    assert!(saved.contains("/dev/*"));
}

#[test]
fn config_prints_effective_toml() {
    let dir = tempdir().expect("tempdir should be created");
    let config = write_config(
        dir.path(),
        r#"
[serial]
baud = 250000
blacklisted_ports = ["/dev/ttyS*"]
"#,
    );

    cli_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--additional-port", "/dev/serial/by-id/*", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("baud = 250000"))
        .stdout(predicate::str::contains("/dev/ttyS*"))
        .stdout(predicate::str::contains("/dev/serial/by-id/*"));
}

#[test]
fn completions_bash_writes_script() {
    cli_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("portscout"));
}
