use crate::cli::Section;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Inventory {
    pub storage: StorageRecord,
    #[serde(default)]
    pub storage_pools: Vec<StoragePool>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub controllers: Vec<Controller>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub disks: Vec<Disk>,
    #[serde(default)]
    pub quotas: Vec<Quota>,
    #[serde(default)]
    pub filesystems: Vec<Filesystem>,
    #[serde(default)]
    pub qtrees: Vec<Qtree>,
    #[serde(default)]
    pub shares: Vec<Share>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageRecord {
    pub name: String,
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
    pub serial_number: Option<String>,
    pub firmware_version: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub total_capacity: Option<u64>,
    pub used_capacity: Option<u64>,
    pub free_capacity: Option<u64>,
    pub raw_capacity: Option<u64>,
    pub subscribed_capacity: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoragePool {
    pub name: String,
    pub storage_id: String,
    pub native_storage_pool_id: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub storage_type: Option<String>,
    pub total_capacity: Option<u64>,
    pub used_capacity: Option<u64>,
    pub free_capacity: Option<u64>,
    pub subscribed_capacity: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Volume {
    pub name: String,
    pub storage_id: String,
    pub native_volume_id: String,
    pub native_storage_pool_id: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub wwn: Option<String>,
    pub total_capacity: Option<u64>,
    pub used_capacity: Option<u64>,
    pub free_capacity: Option<u64>,
    pub compressed: Option<bool>,
    pub deduplicated: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Controller {
    pub name: String,
    pub storage_id: String,
    pub native_controller_id: String,
    pub status: Option<String>,
    pub location: Option<String>,
    pub soft_version: Option<String>,
    pub cpu_info: Option<String>,
    pub memory_size: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Port {
    pub name: String,
    pub storage_id: String,
    pub native_port_id: String,
    pub location: Option<String>,
    pub connection_status: Option<String>,
    pub health_status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub logical_type: Option<String>,
    pub speed: Option<u64>,
    pub max_speed: Option<u64>,
    pub native_parent_id: Option<String>,
    pub wwn: Option<String>,
    pub mac_address: Option<String>,
    pub ipv4: Option<String>,
    pub ipv4_mask: Option<String>,
    pub ipv6: Option<String>,
    pub ipv6_mask: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Disk {
    pub name: String,
    pub storage_id: String,
    pub native_disk_id: String,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub speed: Option<u64>,
    pub capacity: Option<u64>,
    pub status: Option<String>,
    pub physical_type: Option<String>,
    pub logical_type: Option<String>,
    pub health_score: Option<u64>,
    pub native_disk_group_id: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Quota {
    pub native_quota_id: String,
    pub storage_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub native_filesystem_id: Option<String>,
    pub native_qtree_id: Option<String>,
    pub capacity_hard_limit: Option<u64>,
    pub capacity_soft_limit: Option<u64>,
    pub file_hard_limit: Option<u64>,
    pub file_soft_limit: Option<u64>,
    pub file_count: Option<u64>,
    pub used_capacity: Option<u64>,
    pub user_group_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Filesystem {
    pub name: String,
    pub storage_id: String,
    pub native_filesystem_id: String,
    pub native_pool_id: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub security_mode: Option<String>,
    pub worm: Option<String>,
    pub total_capacity: Option<u64>,
    pub used_capacity: Option<u64>,
    pub free_capacity: Option<u64>,
    pub compressed: Option<bool>,
    pub deduplicated: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Qtree {
    pub name: String,
    pub storage_id: String,
    pub native_qtree_id: String,
    pub native_filesystem_id: Option<String>,
    pub path: Option<String>,
    pub security_mode: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Share {
    pub name: String,
    pub storage_id: String,
    pub native_share_id: String,
    pub native_filesystem_id: Option<String>,
    pub native_qtree_id: Option<String>,
    pub protocol: Option<String>,
    pub path: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum InventoryError {
    #[error("fixture root must be a JSON object")]
    NotAnObject,
    #[error("fixture section `{0}` must be an array")]
    SectionNotArray(String),
    #[error("fixture {source_name} is invalid: {errors} schema error(s)")]
    Invalid { source_name: String, errors: usize },
    #[error("fixture {source_name} has {warnings} convention warning(s)")]
    Warnings { source_name: String, warnings: usize },
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::StoragePools,
        Section::Volumes,
        Section::Controllers,
        Section::Ports,
        Section::Disks,
        Section::Quotas,
        Section::Filesystems,
        Section::Qtrees,
        Section::Shares,
    ];

    /// Top-level key of the section in the fixture document.
    pub fn key(&self) -> &'static str {
        match self {
            Section::StoragePools => "storage_pools",
            Section::Volumes => "volumes",
            Section::Controllers => "controllers",
            Section::Ports => "ports",
            Section::Disks => "disks",
            Section::Quotas => "quotas",
            Section::Filesystems => "filesystems",
            Section::Qtrees => "qtrees",
            Section::Shares => "shares",
        }
    }

    /// Field naming a record within its section.
    pub fn identity_field(&self) -> &'static str {
        match self {
            Section::StoragePools => "native_storage_pool_id",
            Section::Volumes => "native_volume_id",
            Section::Controllers => "native_controller_id",
            Section::Ports => "native_port_id",
            Section::Disks => "native_disk_id",
            Section::Quotas => "native_quota_id",
            Section::Filesystems => "native_filesystem_id",
            Section::Qtrees => "native_qtree_id",
            Section::Shares => "native_share_id",
        }
    }
}

/// Raw fixture as read from its source, before any typed parsing.
#[derive(Debug, Clone)]
pub struct LoadedFixture {
    pub source: String,
    pub raw: String,
    pub value: Value,
}

impl LoadedFixture {
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.raw.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Cache location for a remote source; `None` when there is no home to cache under.
fn cache_path(source: &str) -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    let id = hex::encode(hasher.finalize());
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join("dolphinctl")
            .join("fixtures")
            .join(format!("{}.json", id)),
    )
}

fn fetch_fixture_text(source: &str, timeout_ms: u64) -> anyhow::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    let resp = client.get(source).send()?.error_for_status()?;
    Ok(resp.text()?)
}

fn write_cache(cache: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = cache.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(cache, body)
}

fn read_source_text(source: &str, timeout_ms: u64) -> anyhow::Result<String> {
    if !is_remote(source) {
        return Ok(std::fs::read_to_string(source)?);
    }
    let cache = cache_path(source);
    match fetch_fixture_text(source, timeout_ms) {
        Ok(body) => {
            match &cache {
                Some(path) => {
                    if let Err(e) = write_cache(path, &body) {
                        log::warn!("could not cache {} at {}: {}", source, path.display(), e);
                    }
                }
                None => log::debug!("HOME unset, not caching {}", source),
            }
            Ok(body)
        }
        Err(e) => match cache.filter(|p| p.exists()) {
            Some(path) => {
                log::warn!("fetching {} failed ({}), using cached copy", source, e);
                Ok(std::fs::read_to_string(path)?)
            }
            None => Err(e),
        },
    }
}

pub fn load_fixture(source: &str, timeout_ms: u64) -> anyhow::Result<LoadedFixture> {
    let raw = read_source_text(source, timeout_ms)?;
    let value: Value = serde_json::from_str(&raw)?;
    if !value.is_object() {
        return Err(InventoryError::NotAnObject.into());
    }
    log::debug!("loaded fixture {} ({} bytes)", source, raw.len());
    Ok(LoadedFixture {
        source: source.to_string(),
        raw,
        value,
    })
}

/// Typed view of a fixture. Counters written as integral floats (`1.0`) are
/// accepted, since the schema's `integer` type admits them.
pub fn parse_inventory(value: &Value) -> anyhow::Result<Inventory> {
    let mut value = value.clone();
    integral_floats_to_u64(&mut value);
    Ok(serde_json::from_value(value)?)
}

fn integral_floats_to_u64(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            let f = n.as_f64().unwrap_or(-1.0);
            if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
                *value = Value::from(f as u64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_u64),
        Value::Object(map) => map.values_mut().for_each(integral_floats_to_u64),
        _ => {}
    }
}

/// Records of one section; an absent section yields no records.
pub fn section_records<'a>(value: &'a Value, section: Section) -> anyhow::Result<&'a [Value]> {
    match value.get(section.key()) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(InventoryError::SectionNotArray(section.key().to_string()).into()),
    }
}

/// Identity of a record, accepting numeric ids the way loosely typed fixtures carry them.
pub fn record_identity(record: &Value, section: Section) -> Option<String> {
    match record.get(section.identity_field())? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn filter_by_storage<'a>(records: &'a [Value], storage_id: Option<&str>) -> Vec<&'a Value> {
    match storage_id {
        None => records.iter().collect(),
        Some(id) => records
            .iter()
            .filter(|r| r.get("storage_id").and_then(Value::as_str) == Some(id))
            .collect(),
    }
}
