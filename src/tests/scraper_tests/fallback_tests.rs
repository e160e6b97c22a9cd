// src/tests/scraper_tests/fallback_tests.rs
use crate::scraper::fallback::{extract_from_text, FALLBACK_LIMIT};
use crate::scraper::models::SENTINEL;
use crate::scraper::FetchError;
use crate::tests::utils::{scripted_scraper, test_config, ScriptedTransport};
use pretty_assertions::assert_eq;

const RAW_PAGE: &str = "\
<html>
  Waterproof car cover for Creta ₹ 1,200
  ₹2,499 Premium body cover with mirror pockets

  Heavy duty car cover ₹850 free delivery
  2 BHK flat with car cover parking ₹ 9,500
  Seat covers ₹ 50
</html>";

#[test]
fn qualifying_lines_become_title_and_price_only_records() {
    let listings = extract_from_text(RAW_PAGE).unwrap();

    assert_eq!(listings.len(), 3);

    let pairs: Vec<(&str, &str)> = listings
        .iter()
        .map(|l| (l.title.as_str(), l.price.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Waterproof car cover for Creta", "₹ 1,200"),
            ("Premium body cover with mirror pockets", "₹2,499"),
            ("Heavy duty car cover  free delivery", "₹850"),
        ]
    );

    for listing in &listings {
        assert_ne!(listing.title, SENTINEL);
        assert_ne!(listing.price, SENTINEL);
        assert_eq!(listing.location, SENTINEL);
        assert_eq!(listing.date, SENTINEL);
        assert_eq!(listing.link, SENTINEL);
        assert_eq!(listing.image_url, SENTINEL);
        assert_eq!(listing.description, SENTINEL);
    }
}

#[test]
fn result_is_capped() {
    let text: String = (0..30)
        .map(|i| format!("Car cover size {i} ₹ {}\n", 500 + i))
        .collect();

    let listings = extract_from_text(&text).unwrap();
    assert_eq!(listings.len(), FALLBACK_LIMIT);
    assert_eq!(listings[0].title, "Car cover size 0");
    assert_eq!(listings[19].price, "₹ 519");
}

#[test]
fn fallback_scrape_reads_only_the_first_page() {
    let cfg = test_config(1);
    let transport = ScriptedTransport::default();
    transport.push_page(&cfg.search_url, RAW_PAGE);

    let scraper = scripted_scraper(&transport, 1);
    let listings = scraper.fallback_scrape();

    assert_eq!(listings.len(), 3);
    assert_eq!(transport.requests(), vec![cfg.search_url.clone()]);
}

#[test]
fn fallback_scrape_swallows_fetch_failure() {
    let cfg = test_config(2);
    let transport = ScriptedTransport::default();
    transport
        .push(&cfg.search_url, Err(FetchError::Connection("refused".into())))
        .push(&cfg.search_url, Err(FetchError::Connection("refused".into())));

    let scraper = scripted_scraper(&transport, 2);

    assert!(scraper.fallback_scrape().is_empty());
    assert_eq!(transport.requests().len(), 2);
}
