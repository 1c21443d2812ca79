use anyhow::{Context, Result};
use digital_register_core::Settings;
use digital_register_service::{ImportOptions, UprnImporter};
use digital_register_storage::StorageBackend;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

pub(crate) async fn run(
    file: PathBuf,
    skip: usize,
    overwrite: bool,
    clear: bool,
    page_size: usize,
) -> Result<()> {
    let settings = Settings::from_env()?;
    let source = File::open(&file).with_context(|| format!("cannot open {}", file.display()))?;
    tracing::info!(file = %file.display(), "Importing UPRN mapping");

    let storage = Arc::new(StorageBackend::new_postgres(&settings.database_url).await?);
    let options = ImportOptions { skip, overwrite, clear, page_size };
    let summary = UprnImporter::new(storage).import(BufReader::new(source), options).await?;

    tracing::info!(
        saved = summary.saved,
        invalid = summary.invalid,
        cleared = summary.cleared,
        "Completed import"
    );
    Ok(())
}
