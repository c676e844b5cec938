use crate::cli::SignalKind;
use crate::domain::constants::{
    DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_PROCESS_MARKERS, DEFAULT_TEARDOWN_DIRS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn default_markers() -> Vec<String> {
    DEFAULT_PROCESS_MARKERS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_directories() -> Vec<PathBuf> {
    DEFAULT_TEARDOWN_DIRS.iter().map(PathBuf::from).collect()
}

fn default_signal() -> SignalKind {
    SignalKind::Kill
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub teardown: TeardownSettings,
    #[serde(default)]
    pub fixture: FixtureSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TeardownSettings {
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,
    #[serde(default = "default_signal")]
    pub signal: SignalKind,
}

impl Default for TeardownSettings {
    fn default() -> Self {
        Self {
            markers: default_markers(),
            directories: default_directories(),
            signal: default_signal(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixtureSettings {
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

/// A live process whose command line contains one of the teardown markers.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProcessMatch {
    pub pid: u32,
    pub name: String,
    pub marker: String,
    pub command: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ProcessAction {
    pub pid: u32,
    pub name: String,
    pub marker: String,
    pub status: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct DirectoryAction {
    pub path: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct TeardownReport {
    pub overall: String,
    pub dry_run: bool,
    pub signal: SignalKind,
    pub processes: Vec<ProcessAction>,
    pub directories: Vec<DirectoryAction>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Finding {
    pub path: String,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct ValidationReport {
    pub source: String,
    pub sha256: String,
    pub overall: String,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct CapacityTotals {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

#[derive(Serialize, Debug)]
pub struct SummaryReport {
    pub source: String,
    pub storage_name: String,
    pub counts: BTreeMap<String, usize>,
    pub capacity: BTreeMap<String, CapacityTotals>,
    pub volume_status: BTreeMap<String, usize>,
    pub filesystem_status: BTreeMap<String, usize>,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct SectionDiff {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub removed: Vec<String>,
}

impl SectionDiff {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

#[derive(Serialize, Debug)]
pub struct DiffReport {
    pub old: String,
    pub new: String,
    pub storage_changed: bool,
    pub sections: BTreeMap<String, SectionDiff>,
}
