pub mod extractor;
pub mod fallback;
pub mod fetcher;
pub mod filter;
pub mod models;
mod scraper;
mod scraper_error;

pub use models::ListingRecord;
pub use self::scraper::OlxScraper;
pub use scraper_error::{FetchError, ScraperError};

#[cfg(test)]
pub(crate) use self::scraper::find_containers;
