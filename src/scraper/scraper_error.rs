use thiserror::Error;

/// Why a single GET attempt failed. Each class carries its own backoff window.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Backoff window in seconds to wait before the next attempt.
    pub fn backoff_range(&self) -> (f64, f64) {
        match self {
            FetchError::Timeout(_) => (5.0, 10.0),
            FetchError::Connection(_) => (3.0, 8.0),
            FetchError::Request(_) => (2.0, 6.0),
        }
    }

    pub fn status(code: u16) -> Self {
        FetchError::Request(format!("HTTP status {code}"))
    }

    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP client setup failed: {0}")]
    Http(String),
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to fetch {url} after {attempts} attempts: {last}")]
    Fetch {
        url: String,
        attempts: u32,
        last: FetchError,
    },
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    #[error("bad text pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("stopped by user")]
    Interrupted,
}
