use crate::services::process_table::SystemProcessTable;
use crate::services::storage::{audit, config_path};
use crate::services::teardown::{self, TeardownPlan};
use crate::*;

fn pick<T: Clone>(overrides: &[T], configured: &[T]) -> Vec<T> {
    if overrides.is_empty() {
        configured.to_vec()
    } else {
        overrides.to_vec()
    }
}

pub fn handle_host_commands(cli: &Cli, config: &ConfigFile) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Teardown {
            dry_run,
            signal,
            markers,
            dirs,
            strict,
        } => {
            let plan = TeardownPlan {
                markers: pick(markers, &config.teardown.markers),
                directories: pick(dirs, &config.teardown.directories),
                signal: signal.unwrap_or(config.teardown.signal),
                dry_run: *dry_run,
            };
            let mut table = SystemProcessTable::new();
            let report = teardown::run(&mut table, &plan);
            audit(
                "teardown",
                serde_json::json!({
                    "dry_run": report.dry_run,
                    "overall": report.overall,
                    "processes": report.processes.iter().map(|p| p.pid).collect::<Vec<_>>(),
                    "directories": report.directories.iter().map(|d| &d.path).collect::<Vec<_>>(),
                }),
            );
            let needs_attention = report.overall != "ok";
            print_status(cli.json, !needs_attention, &report, |r| {
                let mut lines = vec![format!(
                    "teardown{}: {}",
                    if r.dry_run { " (dry run)" } else { "" },
                    r.overall
                )];
                if r.processes.is_empty() {
                    lines.push("no matching processes".to_string());
                }
                for p in &r.processes {
                    lines.push(format!("process\t{}\t{}\t{}", p.pid, p.status, p.marker));
                }
                for d in &r.directories {
                    match &d.detail {
                        Some(detail) => {
                            lines.push(format!("dir\t{}\t{} ({})", d.path, d.status, detail))
                        }
                        None => lines.push(format!("dir\t{}\t{}", d.path, d.status)),
                    }
                }
                lines
            })?;
            if *strict && needs_attention {
                anyhow::bail!("teardown finished with failed steps");
            }
        }
        Commands::Processes { markers } => {
            let markers = pick(markers, &config.teardown.markers);
            let mut table = SystemProcessTable::new();
            let found = teardown::scan(&mut table, &markers);
            print_out(cli.json, &found, |m| {
                format!("{}\t{}\t{}\t{}", m.pid, m.name, m.marker, m.command)
            })?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let path = config_path(cli.config.as_deref())?;
                let data = serde_json::json!({
                    "path": path.to_string_lossy(),
                    "exists": path.exists(),
                    "config": config,
                });
                print_one(cli.json, data, |_| {
                    let mut lines = vec![format!("# {}", path.display())];
                    match toml::to_string_pretty(config) {
                        Ok(body) => lines.extend(body.lines().map(str::to_string)),
                        Err(e) => lines.push(format!("# unrenderable: {}", e)),
                    }
                    lines
                })?;
            }
        },
        _ => return Ok(false),
    }
    Ok(true)
}
