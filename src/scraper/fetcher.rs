// fetcher.rs
use crate::scraper::{FetchError, ScraperError};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, DNT,
    UPGRADE_INSECURE_REQUESTS,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Pause before every attempt, in seconds.
pub const PACING_SECS: (f64, f64) = (2.0, 5.0);

/// Raw page as handed back to the orchestrator.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl PageResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

/// One blocking GET. Implementations classify their own failures.
pub trait Transport {
    fn get(&self, url: &str) -> Result<PageResponse, FetchError>;

    /// Identify as a different browser from the next request on.
    fn set_user_agent(&mut self, user_agent: &str) -> Result<(), ScraperError>;
}

/// Sleeps between requests. Swapped for a no-op in tests.
pub trait DelayPolicy {
    fn pause(&self, min_secs: f64, max_secs: f64);
}

pub struct RandomDelay;

impl DelayPolicy for RandomDelay {
    fn pause(&self, min_secs: f64, max_secs: f64) {
        let secs = if max_secs > min_secs {
            rand::thread_rng().gen_range(min_secs..=max_secs)
        } else {
            min_secs
        };
        std::thread::sleep(Duration::from_secs_f64(secs.max(0.0)));
    }
}

pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ScraperError> {
        Ok(Self {
            client: Self::build_client(user_agent, timeout)?,
            timeout,
        })
    }

    fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

        // Accept-Encoding is set by reqwest itself from the gzip/brotli/deflate features.
        Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Http(e.to_string()))
    }
}

impl Transport for HttpTransport {
    /// Rebuilds the client with a different UA. Cookies collected so far are dropped.
    fn set_user_agent(&mut self, user_agent: &str) -> Result<(), ScraperError> {
        self.client = Self::build_client(user_agent, self.timeout)?;
        Ok(())
    }

    fn get(&self, url: &str) -> Result<PageResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(FetchError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        let headers = resp.headers().clone();
        let body = resp.text().map_err(FetchError::from_reqwest)?;

        Ok(PageResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

pub struct Fetcher<T = HttpTransport, D = RandomDelay> {
    transport: T,
    delay: D,
    stop: Arc<AtomicBool>,
}

impl<T: Transport, D: DelayPolicy> Fetcher<T, D> {
    pub fn new(transport: T, delay: D) -> Self {
        Self {
            transport,
            delay,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Once `stop` is set, no further request is sent.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// GET `url`, retrying transient failures up to `max_attempts` times.
    ///
    /// Every attempt is preceded by a pacing pause; a failed attempt that is
    /// not the last one is followed by the backoff window of its failure class.
    /// Exhaustion is reported as [`ScraperError::Fetch`] rather than a panic.
    /// A raised stop flag ends the loop with [`ScraperError::Interrupted`].
    pub fn fetch(&self, url: &str, max_attempts: u32) -> Result<PageResponse, ScraperError> {
        let attempts = max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.delay.pause(PACING_SECS.0, PACING_SECS.1);

            if self.is_stopped() {
                info!(url = %url, "Stop requested, not fetching");
                return Err(ScraperError::Interrupted);
            }

            let err = match self.transport.get(url) {
                Ok(resp) => {
                    info!(url = %url, status = resp.status, "Successfully fetched");
                    return Ok(resp);
                }
                Err(err) => err,
            };

            match &err {
                FetchError::Timeout(_) => {
                    warn!(url = %url, attempt, error = %err, "Timeout on attempt")
                }
                FetchError::Connection(_) => {
                    warn!(url = %url, attempt, error = %err, "Connection error on attempt")
                }
                FetchError::Request(_) => {
                    warn!(url = %url, attempt, error = %err, "Request failed on attempt")
                }
            }

            if attempt >= attempts {
                error!(url = %url, attempts, error = %err, "Giving up after exhausting attempts");
                return Err(ScraperError::Fetch {
                    url: url.to_string(),
                    attempts,
                    last: err,
                });
            }

            let (min, max) = err.backoff_range();
            self.delay.pause(min, max);
        }
    }
}
