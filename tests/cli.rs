use assert_cmd::cargo::cargo_bin_cmd;

#[test]
fn help_lists_batch_flags() {
    let mut cmd = cargo_bin_cmd!("tenant-deploy");
    let out = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&out);
    for flag in ["--names", "--start-port", "--config", "--grace-period", "--json"] {
        assert!(text.contains(flag), "help missing {flag}");
    }
}

#[test]
fn names_are_required() {
    let mut cmd = cargo_bin_cmd!("tenant-deploy");
    cmd.arg("--start-port").arg("9000").assert().failure().code(2);
}

#[test]
fn unreadable_config_fails_before_any_tenant() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("tenant-deploy");
    let out = cmd
        .current_dir(dir.path())
        .args(["--names", "acme", "--config", "missing.yaml"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to read config file"), "{stderr}");
    assert!(!dir.path().join("tenants").exists());
}

#[test]
fn unreachable_engine_is_fatal_before_any_tenant() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("tenant-deploy");
    // No `docker` binary on an empty PATH.
    let out = cmd
        .current_dir(dir.path())
        .env("PATH", "")
        .args(["--names", "acme", "globex", "--json"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Docker is not running"), "{stderr}");
    assert!(out.stdout.is_empty(), "{}", String::from_utf8_lossy(&out.stdout));
    assert!(!dir.path().join("tenants").exists());
}
