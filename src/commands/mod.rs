pub mod import;
pub mod migrate;

use crate::Config;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: migrate::MigrateAction,
    },
    /// Load sale records from a local JSON product feed
    Import {
        #[arg(short, long, help = "Path to a JSON array of sale records")]
        file: PathBuf,
    },
}

pub async fn handle_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate { action } => migrate::handle_migrate_command(action, config).await,
        Commands::Import { file } => import::handle_import_command(&file, config).await,
    }
}
