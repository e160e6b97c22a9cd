// config.rs
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Tried once when the connection test fails with the default UA.
pub const ALTERNATE_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub search_url: String,
    pub max_pages: u32,
    pub max_attempts: u32,
    pub request_timeout: Duration,
    pub output_prefix: String,
    pub log_file: PathBuf,
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.olx.in".to_string(),
            search_url: "https://www.olx.in/spare-parts_c1585/q-car-covers".to_string(),
            max_pages: 2,
            max_attempts: 5,
            request_timeout: Duration::from_secs(30),
            output_prefix: "olx_car_covers".to_string(),
            log_file: PathBuf::from("olx_scraper.log"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Defaults overridden by `OLX_*` variables, read after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("OLX_BASE_URL") {
            cfg.base_url = v;
        }
        if let Some(v) = lookup("OLX_SEARCH_URL") {
            cfg.search_url = v;
        }
        if let Some(v) = lookup("OLX_MAX_PAGES") {
            cfg.max_pages = positive("OLX_MAX_PAGES", &v)?;
        }
        if let Some(v) = lookup("OLX_MAX_ATTEMPTS") {
            cfg.max_attempts = positive("OLX_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("OLX_TIMEOUT_SECS") {
            cfg.request_timeout = Duration::from_secs(positive("OLX_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("OLX_OUTPUT_PREFIX") {
            cfg.output_prefix = v;
        }
        if let Some(v) = lookup("OLX_LOG_FILE") {
            cfg.log_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("OLX_USER_AGENT") {
            cfg.user_agent = v;
        }

        Ok(cfg)
    }

    /// Page 1 is the bare search URL; later pages add `page=<n>`.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.search_url.clone()
        } else if self.search_url.contains('?') {
            format!("{}&page={page}", self.search_url)
        } else {
            format!("{}?page={page}", self.search_url)
        }
    }
}

fn positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
