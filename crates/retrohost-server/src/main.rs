//! RetroHost
//!
//! Self-hosted retro gaming: catalogs ROMs, serves them to a browser player
//! and keeps per-game save slots.

use anyhow::{Context, Result};
use clap::Parser;
use retrohost_config::RetroHostConfig;
use retrohost_library::{GameLibrary, SystemRegistry};
use retrohost_server::cli::{self, Cli, Commands};
use retrohost_server::{http, setup_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging();

    let config = RetroHostConfig::load().context("Failed to load configuration")?;
    let library = GameLibrary::new(SystemRegistry::default(), &config.rom_dir, &config.data_dir);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => http::run(&config, library).await,
        Commands::List => {
            print!("{}", cli::list(&library)?);
            Ok(())
        }
        Commands::Covers => {
            print!("{}", cli::covers(&library)?);
            Ok(())
        }
        Commands::Play { query } => {
            let output = cli::play(&library, &config.public_host(), &query.join(" "))?;
            print!("{}", output);
            Ok(())
        }
    }
}
