pub mod export_csv;
pub mod export_json;

pub use export_csv::save_to_csv;
pub use export_json::save_to_json;

use chrono::Local;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `<prefix>_<YYYYMMDD_HHMMSS>.<ext>` in the working directory, local time.
pub fn timestamped_filename(prefix: &str, ext: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{prefix}_{stamp}.{ext}"))
}
