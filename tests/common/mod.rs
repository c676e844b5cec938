#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    tmp: TempDir,
    pub home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        Self { tmp, home }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("dolphinctl");
        cmd.env("HOME", &self.home)
            .env_remove("DOLPHINCTL_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_PROXY", "127.0.0.1")
            .env("no_proxy", "127.0.0.1");
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// JSON printed by a command that is expected to exit non-zero.
    pub fn run_json_failing(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn write_json(&self, name: &str, value: &Value) -> String {
        let path = self.root().join(name);
        fs::write(
            &path,
            serde_json::to_string_pretty(value).expect("serialize fixture"),
        )
        .expect("write fixture");
        path.to_string_lossy().to_string()
    }

    pub fn make_dir_tree(&self, name: &str) -> PathBuf {
        let dir = self.root().join(name);
        fs::create_dir_all(dir.join("nested")).expect("create dir tree");
        fs::write(dir.join("nested/dolphin.conf"), "[DEFAULT]\n").expect("write file");
        dir
    }
}

pub fn fixture_path(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

pub fn sample_fixture() -> Value {
    let raw = fs::read_to_string(fixture_path("storage.json")).expect("read sample fixture");
    serde_json::from_str(&raw).expect("parse sample fixture")
}
