// export_csv.rs
use crate::exports::{timestamped_filename, ExportError};
use crate::scraper::ListingRecord;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Writes `listings` as UTF-8 CSV with a fixed seven-column header.
///
/// Returns the file written, or `None` when writing failed. An empty slice
/// writes nothing but still reports the chosen name.
pub fn save_to_csv(listings: &[ListingRecord], filename: Option<&Path>, prefix: &str) -> Option<PathBuf> {
    let path = filename
        .map(Path::to_path_buf)
        .unwrap_or_else(|| timestamped_filename(prefix, "csv"));

    if listings.is_empty() {
        warn!("No listings to save");
        return Some(path);
    }

    match write_csv(&path, listings) {
        Ok(()) => {
            info!(file = %path.display(), "Data saved");
            Some(path)
        }
        Err(e) => {
            error!(file = %path.display(), error = %e, "Error saving to CSV");
            None
        }
    }
}

fn write_csv(path: &Path, listings: &[ListingRecord]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    // Header comes from the serde field names of ListingRecord.
    for listing in listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;
    Ok(())
}
