use crate::Config;
use crate::database::entities::NewTransaction;
use crate::database::{DatabaseManager, DatabaseManagerImpl, TransactionStore};
use std::path::Path;
use tracing::info;

/// Parse a product feed: a JSON array of sale records
pub fn parse_feed(raw: &str) -> Result<Vec<NewTransaction>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Load sale records from a local JSON file into the configured database
pub async fn handle_import_command(
    file: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(file).await?;
    let records = parse_feed(&raw)?;
    info!(file = %file.display(), records = records.len(), "Parsed product feed");

    let db_manager = DatabaseManagerImpl::new_from_config(&config.database).await?;
    db_manager.migrate().await?;

    let written = db_manager.transactions().insert_many(&records).await?;
    info!(written, "Import completed");
    println!("Imported {} transaction(s) from {}", written, file.display());

    Ok(())
}
