mod cli;
mod commands;
mod domain;
mod inventory;
mod services;

pub(crate) use cli::*;
pub(crate) use domain::models::*;
pub(crate) use services::output::*;

use clap::Parser;
use log::LevelFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // RUST_LOG, when set, wins over -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = services::storage::load_config(cli.config.as_deref())?;

    if commands::handle_host_commands(&cli, &config)? {
        return Ok(());
    }
    commands::handle_fixture_commands(&cli, &config)?;
    Ok(())
}
