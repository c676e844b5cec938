use crate::domain::constants::CONFIG_ENV_VAR;
use crate::domain::models::ConfigFile;
use std::path::{Path, PathBuf};

fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/dolphinctl"))
}

/// `--config`, then `$DOLPHINCTL_CONFIG`, then `~/.config/dolphinctl/config.toml`.
pub fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Ok(p) = std::env::var(CONFIG_ENV_VAR) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let path = config_path(explicit)?;
    if !path.exists() {
        if explicit.is_some() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    let cfg: ConfigFile = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    log::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

/// Append one JSON line to the audit log. Best effort: never fails the caller.
pub fn audit(action: &str, data: serde_json::Value) {
    let path = match config_dir() {
        Ok(d) => d.join("audit.jsonl"),
        Err(_) => return,
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": unix_now(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    if let Err(e) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()))
    {
        log::warn!("could not write audit log {}: {}", path.display(), e);
    }
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SignalKind;
    use tempfile::TempDir;

    #[test]
    fn explicit_missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn partial_config_keeps_defaults_for_the_rest() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("config.toml");
        std::fs::write(&p, "[teardown]\nsignal = \"term\"\n").unwrap();
        let cfg = load_config(Some(&p)).unwrap();
        assert_eq!(cfg.teardown.signal, SignalKind::Term);
        assert_eq!(cfg.teardown.markers.len(), 3);
        assert_eq!(
            cfg.teardown.directories,
            vec![PathBuf::from("/etc/dolphin"), PathBuf::from("/var/lib/dolphin")]
        );
        assert_eq!(cfg.fixture.fetch_timeout_ms, 3000);
    }

    #[test]
    fn malformed_config_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("config.toml");
        std::fs::write(&p, "[teardown\n").unwrap();
        let err = load_config(Some(&p)).unwrap_err().to_string();
        assert!(err.contains("config.toml"));
    }
}
