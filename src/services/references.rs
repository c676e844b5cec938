//! Convention checks over a schema-valid inventory.
//!
//! Fixture records only relate through shared identifier strings, so nothing
//! here is an error: every finding is reported as a warning.

use crate::cli::Section;
use crate::domain::models::Finding;
use crate::inventory::{record_identity, section_records, Inventory};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

pub fn convention_findings(value: &Value, inventory: &Inventory) -> anyhow::Result<Vec<Finding>> {
    let mut out = duplicate_identities(value)?;
    out.extend(dangling_references(inventory));
    out.extend(storage_id_mismatches(inventory));
    out.extend(capacity_mismatches(inventory));
    Ok(out)
}

pub fn duplicate_identities(value: &Value) -> anyhow::Result<Vec<Finding>> {
    let mut out = Vec::new();
    for section in Section::ALL {
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        for (i, record) in section_records(value, section)?.iter().enumerate() {
            let Some(id) = record_identity(record, section) else {
                continue;
            };
            if let Some(first) = first_seen.get(&id) {
                out.push(Finding {
                    path: format!("/{}/{}/{}", section.key(), i, section.identity_field()),
                    message: format!(
                        "duplicate {} `{}` (first at index {})",
                        section.identity_field(),
                        id,
                        first
                    ),
                });
            } else {
                first_seen.insert(id, i);
            }
        }
    }
    Ok(out)
}

fn check_ref(
    out: &mut Vec<Finding>,
    known: &HashSet<&str>,
    reference: Option<&str>,
    path: String,
    target: &str,
) {
    if let Some(r) = reference.filter(|r| !r.is_empty()) {
        if !known.contains(r) {
            out.push(Finding {
                path,
                message: format!("references unknown {} `{}`", target, r),
            });
        }
    }
}

pub fn dangling_references(inv: &Inventory) -> Vec<Finding> {
    let pools: HashSet<&str> = inv
        .storage_pools
        .iter()
        .map(|p| p.native_storage_pool_id.as_str())
        .collect();
    let controllers: HashSet<&str> = inv
        .controllers
        .iter()
        .map(|c| c.native_controller_id.as_str())
        .collect();
    let filesystems: HashSet<&str> = inv
        .filesystems
        .iter()
        .map(|f| f.native_filesystem_id.as_str())
        .collect();
    let qtrees: HashSet<&str> = inv
        .qtrees
        .iter()
        .map(|q| q.native_qtree_id.as_str())
        .collect();

    let mut out = Vec::new();
    for (i, v) in inv.volumes.iter().enumerate() {
        check_ref(
            &mut out,
            &pools,
            v.native_storage_pool_id.as_deref(),
            format!("/volumes/{}/native_storage_pool_id", i),
            "storage pool",
        );
    }
    for (i, p) in inv.ports.iter().enumerate() {
        check_ref(
            &mut out,
            &controllers,
            p.native_parent_id.as_deref(),
            format!("/ports/{}/native_parent_id", i),
            "controller",
        );
    }
    for (i, f) in inv.filesystems.iter().enumerate() {
        check_ref(
            &mut out,
            &pools,
            f.native_pool_id.as_deref(),
            format!("/filesystems/{}/native_pool_id", i),
            "storage pool",
        );
    }
    for (i, q) in inv.qtrees.iter().enumerate() {
        check_ref(
            &mut out,
            &filesystems,
            q.native_filesystem_id.as_deref(),
            format!("/qtrees/{}/native_filesystem_id", i),
            "filesystem",
        );
    }
    for (i, q) in inv.quotas.iter().enumerate() {
        check_ref(
            &mut out,
            &filesystems,
            q.native_filesystem_id.as_deref(),
            format!("/quotas/{}/native_filesystem_id", i),
            "filesystem",
        );
        check_ref(
            &mut out,
            &qtrees,
            q.native_qtree_id.as_deref(),
            format!("/quotas/{}/native_qtree_id", i),
            "qtree",
        );
    }
    for (i, s) in inv.shares.iter().enumerate() {
        check_ref(
            &mut out,
            &filesystems,
            s.native_filesystem_id.as_deref(),
            format!("/shares/{}/native_filesystem_id", i),
            "filesystem",
        );
        check_ref(
            &mut out,
            &qtrees,
            s.native_qtree_id.as_deref(),
            format!("/shares/{}/native_qtree_id", i),
            "qtree",
        );
    }
    out
}

fn storage_ids(inv: &Inventory) -> Vec<(String, &str)> {
    let mut ids = Vec::new();
    macro_rules! collect {
        ($field:ident, $key:literal) => {
            for (i, r) in inv.$field.iter().enumerate() {
                ids.push((format!("/{}/{}/storage_id", $key, i), r.storage_id.as_str()));
            }
        };
    }
    collect!(storage_pools, "storage_pools");
    collect!(volumes, "volumes");
    collect!(controllers, "controllers");
    collect!(ports, "ports");
    collect!(disks, "disks");
    collect!(quotas, "quotas");
    collect!(filesystems, "filesystems");
    collect!(qtrees, "qtrees");
    collect!(shares, "shares");
    ids
}

/// Records whose `storage_id` disagrees with the one most records carry.
pub fn storage_id_mismatches(inv: &Inventory) -> Vec<Finding> {
    let ids = storage_ids(inv);
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, id) in &ids {
        *counts.entry(*id).or_default() += 1;
    }
    if counts.len() < 2 {
        return Vec::new();
    }
    // ties resolve to the lexicographically smallest id
    let mut dominant = "";
    let mut best = 0;
    for (id, n) in &counts {
        if *n > best {
            dominant = *id;
            best = *n;
        }
    }
    ids.into_iter()
        .filter(|(_, id)| *id != dominant)
        .map(|(path, id)| Finding {
            path,
            message: format!("storage_id `{}` differs from `{}`", id, dominant),
        })
        .collect()
}

fn capacity_finding(
    path: String,
    total: Option<u64>,
    used: Option<u64>,
    free: Option<u64>,
) -> Option<Finding> {
    let (total, used, free) = (total?, used?, free?);
    if used.checked_add(free) == Some(total) {
        return None;
    }
    Some(Finding {
        path,
        message: format!(
            "used_capacity {} + free_capacity {} != total_capacity {}",
            used, free, total
        ),
    })
}

pub fn capacity_mismatches(inv: &Inventory) -> Vec<Finding> {
    let s = &inv.storage;
    let mut out: Vec<Finding> = capacity_finding(
        "/storage".to_string(),
        s.total_capacity,
        s.used_capacity,
        s.free_capacity,
    )
    .into_iter()
    .collect();
    out.extend(inv.storage_pools.iter().enumerate().filter_map(|(i, p)| {
        capacity_finding(
            format!("/storage_pools/{}", i),
            p.total_capacity,
            p.used_capacity,
            p.free_capacity,
        )
    }));
    out.extend(inv.volumes.iter().enumerate().filter_map(|(i, v)| {
        capacity_finding(
            format!("/volumes/{}", i),
            v.total_capacity,
            v.used_capacity,
            v.free_capacity,
        )
    }));
    out.extend(inv.filesystems.iter().enumerate().filter_map(|(i, f)| {
        capacity_finding(
            format!("/filesystems/{}", i),
            f.total_capacity,
            f.used_capacity,
            f.free_capacity,
        )
    }));
    out
}
