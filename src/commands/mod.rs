//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `host.rs` — teardown/processes/config commands (touch the live host).
//! - `fixture.rs` — validate/summary/list/diff over inventory fixtures.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod fixture;
pub mod host;

pub use fixture::handle_fixture_commands;
pub use host::handle_host_commands;
