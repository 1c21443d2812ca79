//! Bulk import of the UPRN -> LR UPRN mapping from CSV.
//!
//! Input lines are `lr_uprn,"uprn"` without a header row.

use std::io::Read;
use std::sync::Arc;

use digital_register_core::{UprnMapping, DEFAULT_IMPORT_PAGE_SIZE};
use digital_register_storage::traits::UprnStore;
use digital_register_storage::StorageBackend;
use tokio::sync::mpsc;

use crate::ServiceError;

/// Parsed batches allowed to wait for the database.
const PENDING_BATCHES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Leading lines to ignore.
    pub skip: usize,
    /// Replace mappings that already exist. Has no effect together with `clear`.
    pub overwrite: bool,
    /// Empty the mapping table before importing.
    pub clear: bool,
    /// Rows written per transaction.
    pub page_size: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { skip: 0, overwrite: false, clear: false, page_size: DEFAULT_IMPORT_PAGE_SIZE }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows read and sent to the database.
    pub saved: usize,
    /// Rows with fewer than two fields or an empty value.
    pub invalid: usize,
    /// Rows removed by `clear`.
    pub cleared: usize,
}

pub struct UprnImporter {
    storage: Arc<StorageBackend>,
}

impl UprnImporter {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Parse `source` on the blocking pool and write it batch by batch.
    ///
    /// A failed batch stops the import; earlier batches stay committed.
    pub async fn import<R>(
        &self,
        source: R,
        options: ImportOptions,
    ) -> Result<ImportSummary, ServiceError>
    where
        R: Read + Send + 'static,
    {
        if options.page_size == 0 {
            return Err(ServiceError::InvalidInput("page size must be greater than zero".into()));
        }
        tracing::info!(
            skip = options.skip,
            clear = options.clear,
            overwrite = options.overwrite,
            page_size = options.page_size,
            "Starting data import"
        );

        let mut summary = ImportSummary::default();
        if options.clear {
            summary.cleared = self.storage.clear_uprn_mappings().await?;
            tracing::info!(cleared = summary.cleared, "Cleared mapping table");
        }
        let overwrite = options.overwrite && !options.clear;

        if options.skip > 0 {
            tracing::info!("Skipping first {} lines", options.skip);
        }
        let (batches, mut received) = mpsc::channel(PENDING_BATCHES);
        let parser = tokio::task::spawn_blocking(move || {
            read_mappings(source, options.skip, options.page_size, &batches)
        });

        while let Some(mut batch) = received.recv().await {
            self.flush(&mut batch, overwrite, &mut summary).await?;
        }
        summary.invalid = parser.await??;

        tracing::info!(saved = summary.saved, invalid = summary.invalid, "Completed import");
        Ok(summary)
    }

    async fn flush(
        &self,
        buffer: &mut Vec<UprnMapping>,
        overwrite: bool,
        summary: &mut ImportSummary,
    ) -> Result<(), ServiceError> {
        self.storage.insert_uprn_mappings(buffer, overwrite).await?;
        summary.saved += buffer.len();
        tracing::info!("Saved {} records. Total saved: {}", buffer.len(), summary.saved);
        buffer.clear();
        Ok(())
    }
}

/// Read mapping rows into `page_size` batches, returning the invalid row count.
///
/// Stops early once the receiving side has gone away.
fn read_mappings<R: Read>(
    source: R,
    skip: usize,
    page_size: usize,
    batches: &mpsc::Sender<Vec<UprnMapping>>,
) -> Result<usize, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut invalid = 0;
    let mut buffer: Vec<UprnMapping> = Vec::with_capacity(page_size);
    for (index, record) in reader.records().enumerate().skip(skip) {
        let record = record?;
        let lr_uprn = record.get(0).unwrap_or_default().trim();
        let uprn = record.get(1).unwrap_or_default().replace('"', "");
        let uprn = uprn.trim();
        if lr_uprn.is_empty() || uprn.is_empty() {
            tracing::warn!(line = index + 1, "skipping invalid mapping row");
            invalid += 1;
            continue;
        }
        buffer.push(UprnMapping::new(uprn, lr_uprn));
        if buffer.len() >= page_size {
            let batch = std::mem::replace(&mut buffer, Vec::with_capacity(page_size));
            if batches.blocking_send(batch).is_err() {
                return Ok(invalid);
            }
        }
    }
    if !buffer.is_empty() && batches.blocking_send(buffer).is_err() {
        tracing::debug!("import stopped before the last batch");
    }
    Ok(invalid)
}
