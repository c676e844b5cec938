mod common;

use common::TestEnv;
use predicates::str::contains;
use std::fs;

// Tests run concurrently and every dolphinctl invocation carries its marker in
// argv, so each test needs a marker no other test's marker contains.
fn marker(tag: &str) -> String {
    format!("dolphinctl-e2e-{}-7f3a", tag)
}

#[test]
fn dry_run_reports_without_removing() {
    let env = TestEnv::new();
    let marker = marker("dry-run-reports-without-removing");
    let dir = env.make_dir_tree("etc-dolphin");
    let out = env.run_json(&[
        "teardown",
        "--dry-run",
        "--marker",
        &marker,
        "--dir",
        dir.to_str().unwrap(),
    ]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"]["dry_run"], true);
    assert_eq!(out["data"]["directories"][0]["status"], "would_remove");
    assert!(dir.join("nested/dolphin.conf").exists());
}

#[test]
fn teardown_removes_directories_and_tolerates_absent_ones() {
    let env = TestEnv::new();
    let marker = marker("teardown-removes-directories-and-tolerates-absent-ones");
    let etc = env.make_dir_tree("etc-dolphin");
    let var = env.root().join("var-lib-dolphin-never-created");
    let out = env.run_json(&[
        "teardown",
        "--marker",
        &marker,
        "--dir",
        etc.to_str().unwrap(),
        "--dir",
        var.to_str().unwrap(),
    ]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"]["overall"], "ok");
    assert_eq!(out["data"]["signal"], "kill");
    assert_eq!(out["data"]["processes"].as_array().unwrap().len(), 0);
    assert_eq!(out["data"]["directories"][0]["status"], "removed");
    assert_eq!(out["data"]["directories"][1]["status"], "absent");
    assert!(!etc.exists());
}

#[test]
fn relative_directory_is_refused_and_strict_fails() {
    let env = TestEnv::new();
    let marker = marker("relative-directory-is-refused-and-strict-fails");
    let out = env.run_json(&["teardown", "--marker", &marker, "--dir", "etc/dolphin"]);
    assert_eq!(out["ok"], false);
    assert_eq!(out["data"]["overall"], "needs_attention");
    assert_eq!(out["data"]["directories"][0]["status"], "refused");

    env.cmd()
        .args(["teardown", "--strict", "--marker", &marker, "--dir", "etc/dolphin"])
        .assert()
        .failure()
        .stderr(contains("failed steps"));
}

#[test]
fn teardown_appends_audit_line() {
    let env = TestEnv::new();
    let marker = marker("teardown-appends-audit-line");
    let dir = env.make_dir_tree("audited");
    env.run_json(&["teardown", "--marker", &marker, "--dir", dir.to_str().unwrap()]);
    let audit = fs::read_to_string(env.home.join(".config/dolphinctl/audit.jsonl"))
        .expect("audit log written");
    let last: serde_json::Value =
        serde_json::from_str(audit.lines().last().unwrap()).expect("json line");
    assert_eq!(last["action"], "teardown");
    assert_eq!(last["data"]["overall"], "ok");
}

#[test]
fn processes_does_not_match_itself() {
    let env = TestEnv::new();
    let marker = marker("processes-does-not-match-itself");
    let out = env.run_json(&["processes", "--marker", &marker]);
    assert_eq!(out["ok"], true);
    assert_eq!(out["data"].as_array().unwrap().len(), 0);
}

#[test]
fn config_file_supplies_targets() {
    let env = TestEnv::new();
    let marker = marker("config-file-supplies-targets");
    let dir = env.make_dir_tree("from-config");
    let cfg = env.root().join("dolphinctl.toml");
    fs::write(
        &cfg,
        format!(
            "[teardown]\nmarkers = [\"{}\"]\ndirectories = [\"{}\"]\nsignal = \"term\"\n",
            marker,
            dir.display()
        ),
    )
    .unwrap();

    let shown = env.run_json(&["--config", cfg.to_str().unwrap(), "config", "show"]);
    assert_eq!(shown["data"]["exists"], true);
    assert_eq!(shown["data"]["config"]["teardown"]["signal"], "term");
    assert_eq!(shown["data"]["config"]["fixture"]["fetch_timeout_ms"], 3000);

    let out = env.run_json(&["--config", cfg.to_str().unwrap(), "teardown", "--dry-run"]);
    assert_eq!(out["data"]["signal"], "term");
    assert_eq!(
        out["data"]["directories"][0]["path"],
        dir.to_string_lossy().as_ref()
    );
}

#[test]
fn default_config_targets_dolphin_paths() {
    let env = TestEnv::new();
    let shown = env.run_json(&["config", "show"]);
    assert_eq!(shown["data"]["exists"], false);
    assert_eq!(
        shown["data"]["config"]["teardown"]["directories"],
        serde_json::json!(["/etc/dolphin", "/var/lib/dolphin"])
    );
    assert_eq!(
        shown["data"]["config"]["teardown"]["markers"][0],
        "dolphin/cmd/api.py"
    );
}

#[cfg(target_os = "linux")]
#[test]
fn matching_process_is_killed() {
    use std::process::Command;
    use std::time::{Duration, Instant};

    let env = TestEnv::new();
    let marker = marker("matching-process-is-killed");
    let mut child = Command::new("sh")
        .args(["-c", "while :; do sleep 1; done", &marker])
        .spawn()
        .expect("spawn marker process");

    let scratch = env.make_dir_tree("scratch");
    let out = env.run_json(&[
        "teardown",
        "--marker",
        &marker,
        "--dir",
        scratch.to_str().unwrap(),
    ]);
    let procs = out["data"]["processes"].as_array().unwrap();
    assert_eq!(procs.len(), 1);
    assert_eq!(procs[0]["pid"], child.id());
    assert_eq!(procs[0]["status"], "signalled");

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(status) = child.try_wait().expect("poll child") {
            assert!(!status.success());
            break;
        }
        if Instant::now() > deadline {
            let _ = child.kill();
            panic!("marker process survived teardown");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}
