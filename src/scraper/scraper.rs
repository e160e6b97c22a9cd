// scraper.rs
use crate::config::ScraperConfig;
use crate::scraper::extractor::{parse_selector, ListingExtractor};
use crate::scraper::fallback::extract_from_text;
use crate::scraper::fetcher::{
    DelayPolicy, Fetcher, HttpTransport, PageResponse, RandomDelay, Transport,
};
use crate::scraper::filter::is_relevant;
use crate::scraper::models::ListingRecord;
use crate::scraper::ScraperError;
use scraper::{ElementRef, Html};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

/// One way of locating listing containers in a results page.
type ContainerStrategy = for<'a> fn(&'a Html) -> Vec<ElementRef<'a>>;

/// Tried in order; the first strategy that finds anything wins.
const CONTAINER_STRATEGIES: [(&str, ContainerStrategy); 5] = [
    ("div itemBox", item_box_divs),
    ("div class~item", item_class_divs),
    ("li itemBox", item_box_list_items),
    ("article", articles),
    ("div layout hints", layout_hint_divs),
];

const LAYOUT_HINTS: [&str; 5] = ["listing", "ad", "card", "_1MUx", "UdGd"];
const BROAD_HINTS: [&str; 4] = ["listing", "ad", "item", "card"];

pub struct OlxScraper<T = HttpTransport, D = RandomDelay> {
    config: ScraperConfig,
    base_url: Url,
    extractor: ListingExtractor,
    fetcher: Fetcher<T, D>,
}

impl OlxScraper {
    pub fn new(config: ScraperConfig) -> Result<Self, ScraperError> {
        let transport = HttpTransport::new(&config.user_agent, config.request_timeout)?;
        Self::with_fetcher(config, Fetcher::new(transport, RandomDelay))
    }
}

impl<T: Transport, D: DelayPolicy> OlxScraper<T, D> {
    pub fn with_fetcher(config: ScraperConfig, fetcher: Fetcher<T, D>) -> Result<Self, ScraperError> {
        let base_url = Url::parse(&config.base_url)?;
        let extractor = ListingExtractor::new(base_url.clone())?;
        Ok(Self {
            config,
            base_url,
            extractor,
            fetcher,
        })
    }

    /// Shares `stop` with the fetcher; raising it ends the run after the
    /// request in flight.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.fetcher = self.fetcher.with_stop_flag(stop);
        self
    }

    pub fn is_stopped(&self) -> bool {
        self.fetcher.is_stopped()
    }

    pub fn use_user_agent(&mut self, user_agent: &str) -> Result<(), ScraperError> {
        self.fetcher.transport_mut().set_user_agent(user_agent)
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetches the site root to see whether we get through at all.
    pub fn test_connection(&self) -> Result<PageResponse, ScraperError> {
        self.fetcher.fetch(self.base_url.as_str(), self.config.max_attempts)
    }

    /// Walks result pages `1..=max_pages`, keeping relevant listings in page order.
    ///
    /// A page that cannot be fetched is skipped. A page that is fetched but
    /// yields no kept listing ends the walk.
    pub fn scrape(&self, max_pages: u32) -> Vec<ListingRecord> {
        let mut all_listings = Vec::new();

        info!("Starting to scrape OLX car cover listings");

        for page in 1..=max_pages {
            if self.is_stopped() {
                info!(page, "Stop requested, ending scrape");
                break;
            }

            let page_url = self.config.page_url(page);
            info!(page, url = %page_url, "Scraping page");

            let response = match self.fetcher.fetch(&page_url, self.config.max_attempts) {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(page, error = %e, "Skipping page");
                    continue;
                }
            };

            let page_listings = self.listings_from_html(&response.body, page);
            info!(page, count = page_listings.len(), "Found listings on page");

            if page_listings.is_empty() {
                info!(page, "No more listings found, stopping");
                break;
            }

            all_listings.extend(page_listings);
        }

        info!(total = all_listings.len(), "Total listings scraped");
        all_listings
    }

    /// Text-line heuristics over the first search page. Never fails; problems
    /// are logged and produce an empty list.
    pub fn fallback_scrape(&self) -> Vec<ListingRecord> {
        match self.try_fallback_scrape() {
            Ok(listings) => {
                info!(count = listings.len(), "Fallback method found listings");
                listings
            }
            Err(e) => {
                error!(error = %e, "Fallback method failed");
                Vec::new()
            }
        }
    }

    fn try_fallback_scrape(&self) -> Result<Vec<ListingRecord>, ScraperError> {
        let response = self
            .fetcher
            .fetch(&self.config.search_url, self.config.max_attempts)?;
        extract_from_text(&response.body)
    }

    fn listings_from_html(&self, html: &str, page: u32) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let containers = find_containers(&document, page);

        containers
            .into_iter()
            .map(|container| self.extractor.extract(container))
            .filter(|listing| listing.has_title() && is_relevant(listing))
            .collect()
    }
}

/// Runs the strategy cascade, then the broad class match if every strategy came up empty.
pub fn find_containers(document: &Html, page: u32) -> Vec<ElementRef<'_>> {
    for (name, strategy) in CONTAINER_STRATEGIES {
        let found = strategy(document);
        if !found.is_empty() {
            info!(page, strategy = name, count = found.len(), "Located listing containers");
            return found;
        }
    }

    warn!(page, "No listings found with known selectors, trying broad class match");
    divs_with_class_hint(document, &BROAD_HINTS)
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(e) => {
            error!(error = %e, "Container selector rejected");
            Vec::new()
        }
    }
}

/// `<div>` elements whose class attribute contains any hint, ignoring case.
fn divs_with_class_hint<'a>(document: &'a Html, hints: &[&str]) -> Vec<ElementRef<'a>> {
    let hints: Vec<String> = hints.iter().map(|h| h.to_lowercase()).collect();

    select_all(document, "div[class]")
        .into_iter()
        .filter(|div| {
            let class = div.value().attr("class").unwrap_or_default().to_lowercase();
            hints.iter().any(|hint| class.contains(hint.as_str()))
        })
        .collect()
}

fn item_box_divs(document: &Html) -> Vec<ElementRef<'_>> {
    select_all(document, r#"div[data-aut-id="itemBox"]"#)
}

fn item_class_divs(document: &Html) -> Vec<ElementRef<'_>> {
    divs_with_class_hint(document, &["item"])
}

fn item_box_list_items(document: &Html) -> Vec<ElementRef<'_>> {
    select_all(document, r#"li[data-aut-id="itemBox"]"#)
}

fn articles(document: &Html) -> Vec<ElementRef<'_>> {
    select_all(document, "article")
}

fn layout_hint_divs(document: &Html) -> Vec<ElementRef<'_>> {
    divs_with_class_hint(document, &LAYOUT_HINTS)
}
