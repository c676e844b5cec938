use crate::cli::Section;
use crate::domain::models::{DiffReport, SectionDiff};
use crate::inventory::{record_identity, section_records};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Classify `new` against `old` by identity field: present only in new is added,
/// in both is updated or unchanged, only in old is removed. Each identity lands
/// in exactly one class; when a side repeats an identity its first record counts.
pub fn classify_records(old: &[Value], new: &[Value], section: Section) -> SectionDiff {
    let mut old_by_id: HashMap<String, &Value> = HashMap::new();
    for record in old {
        if let Some(id) = record_identity(record, section) {
            old_by_id.entry(id).or_insert(record);
        }
    }

    let mut diff = SectionDiff::default();
    let mut matched = HashSet::new();
    for record in new {
        let Some(id) = record_identity(record, section) else {
            log::warn!("{} record without {}, skipped", section.key(), section.identity_field());
            continue;
        };
        if matched.contains(&id) {
            log::warn!(
                "duplicate {} `{}` in {}, later record ignored",
                section.identity_field(),
                id,
                section.key()
            );
            continue;
        }
        match old_by_id.get(&id) {
            Some(previous) if *previous == record => diff.unchanged.push(id.clone()),
            Some(_) => diff.updated.push(id.clone()),
            None => diff.added.push(id.clone()),
        }
        matched.insert(id);
    }

    diff.removed = old_by_id
        .into_keys()
        .filter(|id| !matched.contains(id))
        .collect();

    for list in [
        &mut diff.added,
        &mut diff.updated,
        &mut diff.unchanged,
        &mut diff.removed,
    ] {
        list.sort();
        list.dedup();
    }
    diff
}

pub fn diff_fixtures(
    old_name: &str,
    old: &Value,
    new_name: &str,
    new: &Value,
) -> anyhow::Result<DiffReport> {
    let mut sections = BTreeMap::new();
    for section in Section::ALL {
        let diff = classify_records(
            section_records(old, section)?,
            section_records(new, section)?,
            section,
        );
        log::info!(
            "{}: add={} delete={} update={}",
            section.key(),
            diff.added.len(),
            diff.removed.len(),
            diff.updated.len()
        );
        sections.insert(section.key().to_string(), diff);
    }
    Ok(DiffReport {
        old: old_name.to_string(),
        new: new_name.to_string(),
        storage_changed: old.get("storage") != new.get("storage"),
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_are_classified_by_identity() {
        let old = vec![
            json!({"native_volume_id": "a", "name": "vol_a", "status": "available"}),
            json!({"native_volume_id": "b", "name": "vol_b", "status": "available"}),
            json!({"native_volume_id": "c", "name": "vol_c"}),
        ];
        let new = vec![
            json!({"native_volume_id": "a", "name": "vol_a", "status": "available"}),
            json!({"native_volume_id": "b", "name": "vol_b", "status": "error"}),
            json!({"native_volume_id": "d", "name": "vol_d"}),
        ];
        let diff = classify_records(&old, &new, Section::Volumes);
        assert_eq!(diff.unchanged, vec!["a"]);
        assert_eq!(diff.updated, vec!["b"]);
        assert_eq!(diff.added, vec!["d"]);
        assert_eq!(diff.removed, vec!["c"]);
        assert!(!diff.is_unchanged());
    }

    #[test]
    fn repeated_identity_is_classified_once() {
        let old = vec![json!({"native_volume_id": "a", "name": "vol_a"})];
        let new = vec![
            json!({"native_volume_id": "a", "name": "renamed"}),
            json!({"native_volume_id": "a", "name": "vol_a"}),
        ];
        let diff = classify_records(&old, &new, Section::Volumes);
        assert_eq!(diff.updated, vec!["a"]);
        assert!(diff.unchanged.is_empty());
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());

        let diff = classify_records(&new, &old, Section::Volumes);
        assert_eq!(diff.updated, vec!["a"]);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn identical_fixtures_report_no_change() {
        let doc = json!({
            "storage": {"name": "fake"},
            "shares": [{"native_share_id": "s0", "name": "share"}]
        });
        let report = diff_fixtures("a", &doc, "b", &doc).unwrap();
        assert!(!report.storage_changed);
        assert!(report.sections.values().all(|d| d.is_unchanged()));
        assert_eq!(report.sections["shares"].unchanged, vec!["s0"]);
    }

    #[test]
    fn storage_change_is_flagged() {
        let old = json!({"storage": {"name": "fake", "status": "normal"}});
        let new = json!({"storage": {"name": "fake", "status": "abnormal"}});
        assert!(diff_fixtures("a", &old, "b", &new).unwrap().storage_changed);
    }
}
