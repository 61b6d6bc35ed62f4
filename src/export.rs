//! CSV artifact writer. A pure read of the dataset; overwritten every cycle.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::dataset::QuoteDataset;
use crate::error::ArtifactError;

/// UTF-8 byte-order mark. The page data carries accented Portuguese text and
/// spreadsheet tools expect the mark to pick the right encoding.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub fn write_csv(dataset: &QuoteDataset, path: &Path) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(dataset.header())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = dataset.len(), "CSV artifact written");
    Ok(())
}
