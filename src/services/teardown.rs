use crate::cli::SignalKind;
use crate::domain::models::{DirectoryAction, ProcessAction, ProcessMatch, TeardownReport};
use crate::services::process_table::ProcessTable;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TeardownPlan {
    pub markers: Vec<String>,
    pub directories: Vec<PathBuf>,
    pub signal: SignalKind,
    pub dry_run: bool,
}

/// Processes whose command line contains any marker, first marker wins.
/// This process and its ancestors are never matched, since their argv
/// usually carries the marker itself.
pub fn scan(table: &mut dyn ProcessTable, markers: &[String]) -> Vec<ProcessMatch> {
    let mut entries = table.snapshot();
    entries.sort_by_key(|e| e.pid);
    let excluded = table.excluded_pids();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for marker in markers.iter().filter(|m| !m.trim().is_empty()) {
        for entry in &entries {
            if excluded.contains(&entry.pid) || seen.contains(&entry.pid) {
                continue;
            }
            if entry.command.contains(marker.as_str()) {
                seen.insert(entry.pid);
                out.push(ProcessMatch {
                    pid: entry.pid,
                    name: entry.name.clone(),
                    marker: marker.clone(),
                    command: entry.command.clone(),
                });
            }
        }
    }

    out.sort_by_key(|m| m.pid);
    out
}

fn refusal_reason(path: &Path) -> Option<&'static str> {
    if path.as_os_str().is_empty() {
        return Some("empty path");
    }
    if !path.is_absolute() {
        return Some("relative path");
    }
    if path
        .components()
        .all(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
    {
        return Some("filesystem root");
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Some("path contains `..`");
    }
    None
}

pub fn remove_directory(path: &Path, dry_run: bool) -> DirectoryAction {
    let shown = path.to_string_lossy().to_string();
    let action = |status: &str, detail: Option<String>| DirectoryAction {
        path: shown.clone(),
        status: status.to_string(),
        detail,
    };

    if let Some(reason) = refusal_reason(path) {
        log::warn!("refusing to remove {}: {}", shown, reason);
        return action("refused", Some(reason.to_string()));
    }
    // symlink_metadata so a dangling link still counts as present
    if std::fs::symlink_metadata(path).is_err() {
        log::debug!("{} already absent", shown);
        return action("absent", None);
    }
    if dry_run {
        return action("would_remove", None);
    }

    let result = if path.is_dir() && !path.is_symlink() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => {
            log::info!("removed {}", shown);
            action("removed", None)
        }
        Err(e) => {
            log::error!("failed to remove {}: {}", shown, e);
            action("failed", Some(e.to_string()))
        }
    }
}

/// Signal every match, then remove every directory. A failed step never stops later ones.
pub fn run(table: &mut dyn ProcessTable, plan: &TeardownPlan) -> TeardownReport {
    let matches = scan(table, &plan.markers);
    let mut processes = Vec::with_capacity(matches.len());

    for m in matches {
        let status = if plan.dry_run {
            "would_signal".to_string()
        } else {
            let outcome = table.signal(m.pid, plan.signal);
            log::info!(
                "pid {} ({}) matched {}: {}",
                m.pid,
                m.name,
                m.marker,
                outcome.as_status()
            );
            outcome.as_status().to_string()
        };
        processes.push(ProcessAction {
            pid: m.pid,
            name: m.name,
            marker: m.marker,
            status,
        });
    }

    let directories: Vec<DirectoryAction> = plan
        .directories
        .iter()
        .map(|d| remove_directory(d, plan.dry_run))
        .collect();

    let any_failed = processes
        .iter()
        .any(|p| p.status == "failed" || p.status == "unsupported")
        || directories
            .iter()
            .any(|d| d.status == "failed" || d.status == "refused");

    TeardownReport {
        overall: if any_failed { "needs_attention" } else { "ok" }.to_string(),
        dry_run: plan.dry_run,
        signal: plan.signal,
        processes,
        directories,
    }
}
