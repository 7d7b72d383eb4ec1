//! turtle - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use turtle::cli::{Cli, Commands, ConfigCommands};
use turtle::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path);

    let level = config
        .as_ref()
        .map_or_else(|_| turtle::config::default_log_level(), |c| c.log.level.clone());
    init_tracing(&level);

    match cli.command {
        Commands::Connect { host, port, plain } => {
            commands::connect::handle(&host, port, plain, &config?)
        }
        Commands::Decode { file, chunk } => commands::decode::handle(&file, chunk, &config?),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config_path),
            ConfigCommands::Init { force } => {
                commands::config::handle_init(&config_path, force)
            }
        },
    }
}

/// Log to stderr, filtered by TURTLE_LOG or else the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("TURTLE_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
