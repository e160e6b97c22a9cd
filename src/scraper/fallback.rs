// fallback.rs
use crate::scraper::filter::{price_digits, price_in_band};
use crate::scraper::models::ListingRecord;
use crate::scraper::ScraperError;
use regex::Regex;

pub const FALLBACK_LIMIT: usize = 20;

const PRICE_PATTERN: &str = r"₹\s*[\d,]+";
const PRODUCT_KEYWORDS: [&str; 2] = ["cover", "body"];
const EXCLUDED_KEYWORDS: [&str; 2] = ["bhk", "parking"];

/// Recovers approximate listings from raw page text, one per qualifying line.
///
/// A line qualifies when it carries a rupee amount, a product keyword and no
/// excluded keyword. The first amount on the line becomes the price (kept as
/// written) and what remains of the line becomes the title. At most
/// [`FALLBACK_LIMIT`] records are returned, in page order.
pub fn extract_from_text(text: &str) -> Result<Vec<ListingRecord>, ScraperError> {
    let price_re = Regex::new(PRICE_PATTERN)?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| listing_from_line(line, &price_re))
        .take(FALLBACK_LIMIT)
        .collect())
}

fn listing_from_line(line: &str, price_re: &Regex) -> Option<ListingRecord> {
    let lower = line.to_lowercase();
    if !PRODUCT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return None;
    }
    if EXCLUDED_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return None;
    }

    let price = price_re.find(line)?.as_str();
    if !price_digits(price).is_some_and(price_in_band) {
        return None;
    }

    let title = line.replace(price, "");
    let title = title.trim();
    if title.chars().count() <= 5 {
        return None;
    }

    Some(ListingRecord::from_title_and_price(title, price))
}
