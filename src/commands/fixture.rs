use crate::inventory::{
    filter_by_storage, load_fixture, parse_inventory, section_records, InventoryError,
};
use crate::services::summary::summarize;
use crate::services::sync_diff::diff_fixtures;
use crate::services::validation::validate_fixture;
use crate::*;

fn finding_lines(kind: &str, findings: &[Finding]) -> Vec<String> {
    findings
        .iter()
        .map(|f| format!("{}\t{}\t{}", kind, f.path, f.message))
        .collect()
}

pub fn handle_fixture_commands(cli: &Cli, config: &ConfigFile) -> anyhow::Result<bool> {
    let Commands::Fixture { command } = &cli.command else {
        return Ok(false);
    };
    let timeout_ms = config.fixture.fetch_timeout_ms;

    match command {
        FixtureCommands::Validate { source, strict } => {
            let fixture = load_fixture(source, timeout_ms)?;
            let report = validate_fixture(&fixture)?;
            let failed = !report.errors.is_empty() || (*strict && !report.warnings.is_empty());
            print_status(cli.json, !failed, &report, |r| {
                let mut lines = vec![format!("fixture {}: {}", r.source, r.overall)];
                lines.extend(finding_lines("error", &r.errors));
                lines.extend(finding_lines("warning", &r.warnings));
                lines
            })?;
            if !report.errors.is_empty() {
                return Err(InventoryError::Invalid {
                    source_name: report.source,
                    errors: report.errors.len(),
                }
                .into());
            }
            if failed {
                return Err(InventoryError::Warnings {
                    source_name: report.source,
                    warnings: report.warnings.len(),
                }
                .into());
            }
        }
        FixtureCommands::Summary { source } => {
            let fixture = load_fixture(source, timeout_ms)?;
            let inv = parse_inventory(&fixture.value)?;
            let report = summarize(source, &inv);
            print_one(cli.json, report, |r| {
                let mut lines = vec![format!("storage: {}", r.storage_name)];
                for (section, n) in &r.counts {
                    lines.push(format!("{}\t{}", section, n));
                }
                for (scope, c) in &r.capacity {
                    lines.push(format!(
                        "capacity:{}\ttotal={} used={} free={}",
                        scope, c.total, c.used, c.free
                    ));
                }
                lines
            })?;
        }
        FixtureCommands::List {
            source,
            section,
            storage_id,
        } => {
            let fixture = load_fixture(source, timeout_ms)?;
            let records = section_records(&fixture.value, *section)?;
            let selected = filter_by_storage(records, storage_id.as_deref());
            let id_field = section.identity_field();
            print_out(cli.json, &selected, |r| {
                let text = |k: &str| match r.get(k) {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(serde_json::Value::Null) | None => "-".to_string(),
                    Some(other) => other.to_string(),
                };
                format!("{}\t{}\t{}", text(id_field), text("name"), text("status"))
            })?;
        }
        FixtureCommands::Diff { old, new } => {
            let old_fixture = load_fixture(old, timeout_ms)?;
            let new_fixture = load_fixture(new, timeout_ms)?;
            let report = diff_fixtures(old, &old_fixture.value, new, &new_fixture.value)?;
            print_one(cli.json, report, |r| {
                let mut lines = vec![format!(
                    "storage\t{}",
                    if r.storage_changed { "updated" } else { "unchanged" }
                )];
                for (section, d) in &r.sections {
                    if d.is_unchanged() {
                        lines.push(format!("{}\tunchanged ({})", section, d.unchanged.len()));
                        continue;
                    }
                    lines.push(format!(
                        "{}\tadded={} updated={} removed={} unchanged={}",
                        section,
                        d.added.len(),
                        d.updated.len(),
                        d.removed.len(),
                        d.unchanged.len()
                    ));
                }
                lines
            })?;
        }
    }

    Ok(true)
}
