// export_json.rs
use crate::exports::{timestamped_filename, ExportError};
use crate::scraper::ListingRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Pretty-printed JSON array of listing objects. Same contract as
/// [`save_to_csv`](crate::exports::save_to_csv).
pub fn save_to_json(listings: &[ListingRecord], filename: Option<&Path>, prefix: &str) -> Option<PathBuf> {
    let path = filename
        .map(Path::to_path_buf)
        .unwrap_or_else(|| timestamped_filename(prefix, "json"));

    if listings.is_empty() {
        warn!("No listings to save");
        return Some(path);
    }

    match write_json(&path, listings) {
        Ok(()) => {
            info!(file = %path.display(), "Data saved");
            Some(path)
        }
        Err(e) => {
            error!(file = %path.display(), error = %e, "Error saving to JSON");
            None
        }
    }
}

fn write_json(path: &Path, listings: &[ListingRecord]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, listings)?;
    writer.flush()?;
    Ok(())
}
