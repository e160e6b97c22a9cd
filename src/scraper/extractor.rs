// extractor.rs
use crate::scraper::models::{or_sentinel, ListingRecord};
use crate::scraper::ScraperError;
use scraper::{ElementRef, Selector};
use url::Url;

const TITLE_MARKER: &str = "itemTitle";
const PRICE_MARKER: &str = "itemPrice";
const LOCATION_MARKER: &str = "item-location";
const DATE_MARKER: &str = "itemDate";
const DESCRIPTION_MARKER: &str = "itemDescription";

/// Pulls [`ListingRecord`]s out of listing containers.
///
/// Fields are located through their `data-aut-id` marker, never a class name.
/// Selectors are compiled once in [`ListingExtractor::new`]; extraction itself
/// cannot fail, missing elements just become the sentinel.
pub struct ListingExtractor {
    base_url: Url,
    link: Selector,
    image: Selector,
    title: Selector,
    price: Selector,
    location: Selector,
    date: Selector,
    description: Selector,
}

impl ListingExtractor {
    /// `base_url` is what relative listing links are resolved against.
    pub fn new(base_url: Url) -> Result<Self, ScraperError> {
        Ok(Self {
            base_url,
            link: parse_selector("a[href]")?,
            image: parse_selector("img")?,
            title: marker_selector(TITLE_MARKER)?,
            price: marker_selector(PRICE_MARKER)?,
            location: marker_selector(LOCATION_MARKER)?,
            date: marker_selector(DATE_MARKER)?,
            description: marker_selector(DESCRIPTION_MARKER)?,
        })
    }

    pub fn extract(&self, container: ElementRef<'_>) -> ListingRecord {
        let link = container
            .select(&self.link)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| !href.trim().is_empty())
            .and_then(|href| self.base_url.join(href.trim()).ok())
            .map(|url| url.to_string());

        let image_url = container
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        ListingRecord {
            title: first_text(container, &self.title),
            price: first_text(container, &self.price),
            location: first_text(container, &self.location),
            date: first_text(container, &self.date),
            link: or_sentinel(link),
            image_url: or_sentinel(image_url),
            description: first_text(container, &self.description),
        }
    }
}

/// `span[data-aut-id=<marker>]`
fn marker_selector(marker: &str) -> Result<Selector, ScraperError> {
    parse_selector(&format!(r#"span[data-aut-id="{marker}"]"#))
}

fn first_text(container: ElementRef<'_>, selector: &Selector) -> String {
    or_sentinel(container.select(selector).next().map(stripped_text))
}

/// Each text node trimmed, empty ones dropped, the rest joined.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

pub fn parse_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("bad selector {css:?}: {e}")))
}
