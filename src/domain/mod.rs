//! Shared data model layer (structs/constants only).
//!
//! ## Files
//! - `models.rs` — config, teardown and fixture report structs.
//! - `constants.rs` — default teardown targets and env var names.
//!
//! Domain types are data-only: no filesystem, process or network side effects.
//!
//! ## Compatibility note
//! Report structs are the `--json` output. Keep them in sync with
//! `docs/contracts/*.schema.json`.

pub mod constants;
pub mod models;
