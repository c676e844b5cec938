//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `process_table.rs` — process table snapshot + signalling (`sysinfo`).
//! - `teardown.rs` — marker scan, signal pass, directory removal.
//! - `schema.rs` — JSON Schema conformance of inventory fixtures.
//! - `references.rs` — identifier/capacity convention checks.
//! - `validation.rs` — combined validation report.
//! - `summary.rs` — counts and capacity totals.
//! - `sync_diff.rs` — add/update/remove classification between fixtures.
//! - `storage.rs` — config file + audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod output;
pub mod process_table;
pub mod references;
pub mod schema;
pub mod storage;
pub mod summary;
pub mod sync_diff;
pub mod teardown;
pub mod validation;
