// filter.rs
use crate::scraper::models::ListingRecord;

/// Real-estate and unrelated-category terms. Any hit rejects the listing.
pub const EXCLUDE_KEYWORDS: [&str; 9] = [
    "bhk", "bathroom", "sqft", "flat", "parking", "rent", "sale", "villa", "office",
];

pub const INCLUDE_KEYWORDS: [&str; 5] = ["cover", "body cover", "car cover", "waterproof", "dust proof"];

/// Inclusive band of plausible car cover prices, in rupees.
pub const PRICE_MIN: u64 = 100;
pub const PRICE_MAX: u64 = 10_000;

/// Every ASCII digit of `text` concatenated and parsed. `None` when there are
/// no digits or the number does not fit.
pub fn price_digits(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

pub fn price_in_band(price: u64) -> bool {
    (PRICE_MIN..=PRICE_MAX).contains(&price)
}

/// Keeps a listing only when its title names a car cover, names nothing from
/// the excluded categories, and its price sits in the plausible band.
/// Anything else, including a title with no inclusion term at all, is false.
pub fn is_relevant(listing: &ListingRecord) -> bool {
    let title = listing.title.to_lowercase();

    if EXCLUDE_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return false;
    }

    if !INCLUDE_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return false;
    }

    price_digits(&listing.price).is_some_and(price_in_band)
}
