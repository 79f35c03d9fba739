#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;

fn portflow() -> Command {
    let mut cmd = Command::cargo_bin("portflow").unwrap();
    // 開発者の設定ファイルや環境変数の影響を受けないようにする
    cmd.current_dir(std::env::temp_dir())
        .env_remove("PORTFLOW_CONFIG_PATH")
        .env_remove("PORTFLOW_MAX_AUTO_RANGE");
    cmd
}

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    portflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("decode"));
}

#[test]
fn test_cli_version() {
    portflow()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("portflow"));
}

#[test]
fn test_parse_prints_port_listing() {
    portflow()
        .args(["parse", "127.0.0.1:3000-3001:8080-8081/tcp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8080/tcp -> 127.0.0.1:3000"))
        .stdout(predicate::str::contains("8081/tcp -> 127.0.0.1:3001"));
}

#[test]
fn test_parse_ipv6_listing() {
    portflow()
        .args(["parse", "[::0]:8080:80/tcp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("80/tcp -> [::0]:8080"));
}

#[test]
fn test_parse_json_output() {
    portflow()
        .args(["parse", "--json", "3000:8080/tcp"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"[{"HostPort":3000,"ContainerPort":8080,"Protocol":"tcp","HostIP":"0.0.0.0"}]"#,
        ));
}

fn write_pool_config(dir: &std::path::Path) -> std::path::PathBuf {
    let config = dir.join("portflow.yaml");
    std::fs::write(
        &config,
        "publish:\n  auto_port_range:\n    start: 40000\n    end: 40010\n",
    )
    .unwrap();
    config
}

#[test]
fn test_parse_assigns_from_configured_pool() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_pool_config(temp_dir.path());

    portflow()
        .arg("--config")
        .arg(&config)
        .args(["parse", "80-81"])
        .assert()
        .success()
        .stdout(predicate::str::contains("80/tcp -> 0.0.0.0:40000"))
        .stdout(predicate::str::contains("81/tcp -> 0.0.0.0:40001"))
        .stdout(predicate::str::contains("(auto)").not());
}

#[test]
fn test_parse_raw_keeps_auto_host_port() {
    portflow()
        .args(["parse", "--raw", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("80/tcp -> 0.0.0.0:0"))
        .stdout(predicate::str::contains("(auto)"));
}

#[test]
fn test_encode_writes_assigned_host_port() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = write_pool_config(temp_dir.path());

    portflow()
        .arg("--config")
        .arg(&config)
        .args(["encode", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""HostPort":40000"#))
        .stdout(predicate::str::contains(r#""HostPort":0"#).not());
}

#[test]
fn test_missing_config_path_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    portflow()
        .env("PORTFLOW_CONFIG_PATH", temp_dir.path().join("missing.yaml"))
        .args(["parse", "80"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.yaml"));
}

#[test]
fn test_parse_invalid_protocol_fails() {
    portflow()
        .args(["parse", "3000:8080/invalid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_parse_range_too_large_fails() {
    portflow()
        .args(["parse", "49153-61000"])
        .assert()
        .failure();
}

#[test]
fn test_max_auto_range_flag_overrides_default() {
    portflow()
        .args(["--max-auto-range", "1", "parse", "80-81"])
        .assert()
        .failure();

    portflow()
        .args(["--max-auto-range", "2", "parse", "80-81"])
        .assert()
        .success();
}

#[test]
fn test_encode_then_decode() {
    let output = portflow()
        .args(["encode", "127.0.0.1:3000:8080/udp"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let label = String::from_utf8(output.stdout).unwrap();

    portflow()
        .args(["decode", label.trim()])
        .assert()
        .success()
        .stdout(predicate::str::contains("8080/udp -> 127.0.0.1:3000"));
}

#[test]
fn test_decode_empty_value() {
    portflow()
        .args(["decode", ""])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_decode_object_fails() {
    portflow()
        .args([
            "decode",
            r#"{"HostPort":12345,"ContainerPort":10000,"Protocol":"tcp","HostIP":"0.0.0.0"}"#,
        ])
        .assert()
        .failure();
}

#[test]
fn test_invalid_command() {
    portflow().arg("invalid-command").assert().failure();
}
