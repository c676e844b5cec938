use crate::cli::Section;
use crate::domain::models::{CapacityTotals, SummaryReport};
use crate::inventory::Inventory;
use std::collections::BTreeMap;

fn add_capacity(
    acc: &mut CapacityTotals,
    total: Option<u64>,
    used: Option<u64>,
    free: Option<u64>,
) {
    acc.total = acc.total.saturating_add(total.unwrap_or(0));
    acc.used = acc.used.saturating_add(used.unwrap_or(0));
    acc.free = acc.free.saturating_add(free.unwrap_or(0));
}

fn status_breakdown<'a>(statuses: impl Iterator<Item = Option<&'a str>>) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for s in statuses {
        *out.entry(s.unwrap_or("unknown").to_string()).or_default() += 1;
    }
    out
}

pub fn summarize(source: &str, inv: &Inventory) -> SummaryReport {
    let counts: BTreeMap<String, usize> = Section::ALL
        .iter()
        .map(|s| {
            let n = match s {
                Section::StoragePools => inv.storage_pools.len(),
                Section::Volumes => inv.volumes.len(),
                Section::Controllers => inv.controllers.len(),
                Section::Ports => inv.ports.len(),
                Section::Disks => inv.disks.len(),
                Section::Quotas => inv.quotas.len(),
                Section::Filesystems => inv.filesystems.len(),
                Section::Qtrees => inv.qtrees.len(),
                Section::Shares => inv.shares.len(),
            };
            (s.key().to_string(), n)
        })
        .collect();

    let mut capacity = BTreeMap::new();

    let mut storage = CapacityTotals::default();
    add_capacity(
        &mut storage,
        inv.storage.total_capacity,
        inv.storage.used_capacity,
        inv.storage.free_capacity,
    );
    capacity.insert("storage".to_string(), storage);

    let mut pools = CapacityTotals::default();
    for p in &inv.storage_pools {
        add_capacity(&mut pools, p.total_capacity, p.used_capacity, p.free_capacity);
    }
    capacity.insert("storage_pools".to_string(), pools);

    let mut volumes = CapacityTotals::default();
    for v in &inv.volumes {
        add_capacity(&mut volumes, v.total_capacity, v.used_capacity, v.free_capacity);
    }
    capacity.insert("volumes".to_string(), volumes);

    let mut filesystems = CapacityTotals::default();
    for f in &inv.filesystems {
        add_capacity(
            &mut filesystems,
            f.total_capacity,
            f.used_capacity,
            f.free_capacity,
        );
    }
    capacity.insert("filesystems".to_string(), filesystems);

    SummaryReport {
        source: source.to_string(),
        storage_name: inv.storage.name.clone(),
        counts,
        capacity,
        volume_status: status_breakdown(inv.volumes.iter().map(|v| v.status.as_deref())),
        filesystem_status: status_breakdown(inv.filesystems.iter().map(|f| f.status.as_deref())),
    }
}
