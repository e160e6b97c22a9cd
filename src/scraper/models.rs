use serde::{Deserialize, Serialize};

/// Placeholder stored in any field that could not be located on the page.
pub const SENTINEL: &str = "N/A";

// listing
//  ├── title        itemTitle
//  ├── price        itemPrice (raw text, e.g. "₹ 1,500")
//  ├── location     item-location
//  ├── date         itemDate (as shown, never normalized)
//  ├── link         first <a href>, absolute
//  ├── image_url    first <img src>
//  └── description  itemDescription

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub price: String,
    pub location: String,
    pub date: String,
    pub link: String,
    pub image_url: String,
    pub description: String,
}

impl ListingRecord {
    /// A record recovered from a bare text line: only title and price are known.
    pub fn from_title_and_price(title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            ..Self::default()
        }
    }

    pub fn has_title(&self) -> bool {
        self.title != SENTINEL
    }
}

impl Default for ListingRecord {
    fn default() -> Self {
        Self {
            title: SENTINEL.to_string(),
            price: SENTINEL.to_string(),
            location: SENTINEL.to_string(),
            date: SENTINEL.to_string(),
            link: SENTINEL.to_string(),
            image_url: SENTINEL.to_string(),
            description: SENTINEL.to_string(),
        }
    }
}

/// Wraps an optional scraped value, falling back to the sentinel.
pub fn or_sentinel(value: Option<String>) -> String {
    value.unwrap_or_else(|| SENTINEL.to_string())
}
