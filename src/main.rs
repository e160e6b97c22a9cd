use crate::config::{ScraperConfig, ALTERNATE_USER_AGENT};
use crate::exports::{save_to_csv, save_to_json};
use crate::scraper::fetcher::{DelayPolicy, PageResponse, Transport};
use crate::scraper::{ListingRecord, OlxScraper, ScraperError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod exports;
mod logging;
mod scraper;


fn main() {
    // 1️⃣ Configuration from the environment (and .env)
    let config = match ScraperConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            return;
        }
    };

    // 2️⃣ Logging to stdout + log file; the guard flushes the file on drop
    let _log_guard = match logging::init_logging(&config.log_file) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("⚠️ Logging disabled: {e:#}");
            None
        }
    };

    // 3️⃣ Ctrl+C raises a flag; the scraper stops after the request in flight
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::SeqCst);
    }) {
        eprintln!("⚠️ Could not install Ctrl+C handler: {e}");
    }

    let log_file = config.log_file.clone();
    if let Err(e) = run(config, Arc::clone(&stop)) {
        let detail = format!("{e:#}");
        error!(error = %detail, "Error in main execution");
        println!("❌ An error occurred: {e}");
        println!("Check {} for detailed error information", log_file.display());
    }

    if stop.load(Ordering::SeqCst) {
        info!("Scraping stopped by user");
        println!("\n⏹️  Scraping stopped by user");
    }
}

fn run(config: ScraperConfig, stop: Arc<AtomicBool>) -> anyhow::Result<()> {
    let mut scraper = OlxScraper::new(config)?.with_stop_flag(stop);

    println!("Starting OLX Car Cover Scraper...");
    println!("Testing connection first...");

    if let Some(resp) = check_connection(&mut scraper)? {
        println!("✅ Connection successful!");
        println!("Response status: {}", resp.status);
        println!("Content type: {}", resp.content_type().unwrap_or("unknown"));
        println!("Content length: {} bytes", resp.body.len());
    }

    let listings = collect_listings(&scraper);

    // Nothing is written for an interrupted run.
    if scraper.is_stopped() {
        return Ok(());
    }

    report(&listings, &scraper.config().output_prefix);
    Ok(())
}

/// Tests the connection, switching to the alternate UA once if the first try
/// fails. A connection that still fails is not fatal; scraping goes ahead.
fn check_connection<T: Transport, D: DelayPolicy>(
    scraper: &mut OlxScraper<T, D>,
) -> Result<Option<PageResponse>, ScraperError> {
    if let Ok(resp) = scraper.test_connection() {
        return Ok(Some(resp));
    }
    if scraper.is_stopped() {
        return Ok(None);
    }

    println!("❌ Cannot connect to OLX. Possible reasons:");
    println!("1. Internet connection issues");
    println!("2. OLX is blocking requests");
    println!("3. Site is temporarily down");
    println!("\nTrying alternative approach...");

    scraper.use_user_agent(ALTERNATE_USER_AGENT)?;
    Ok(scraper.test_connection().ok())
}

/// Structured scrape over the configured pages, then the text fallback if
/// that kept nothing.
fn collect_listings<T: Transport, D: DelayPolicy>(scraper: &OlxScraper<T, D>) -> Vec<ListingRecord> {
    let listings = scraper.scrape(scraper.config().max_pages);
    if !listings.is_empty() || scraper.is_stopped() {
        return listings;
    }

    println!("🔄 Trying fallback method...");
    scraper.fallback_scrape()
}

/// Saves and summarizes `listings`, or prints troubleshooting hints when
/// there are none. Returns the CSV and JSON paths when anything was saved.
fn report(listings: &[ListingRecord], prefix: &str) -> Option<(Option<PathBuf>, Option<PathBuf>)> {
    if listings.is_empty() {
        print_troubleshooting();
        return None;
    }

    let csv_file = save_to_csv(listings, None, prefix);
    let json_file = save_to_json(listings, None, prefix);

    print_summary(listings, csv_file.as_deref(), json_file.as_deref());
    Some((csv_file, json_file))
}

fn print_summary(listings: &[ListingRecord], csv_file: Option<&Path>, json_file: Option<&Path>) {
    let shown = |file: Option<&Path>| {
        file.map(|p| p.display().to_string())
            .unwrap_or_else(|| "not saved (see log)".to_string())
    };

    println!("\n✅ Scraping completed!");
    println!("Total listings found: {}", listings.len());
    println!("CSV file: {}", shown(csv_file));
    println!("JSON file: {}", shown(json_file));

    println!("\nFirst 3 listings preview:");
    for (i, listing) in listings.iter().take(3).enumerate() {
        println!("\n{}. {}", i + 1, listing.title);
        println!("   Price: {}", listing.price);
        println!("   Location: {}", listing.location);
        println!("   Date: {}", listing.date);
        println!("   Link: {}", listing.link);
    }
}

fn print_troubleshooting() {
    println!("❌ No listings found. Troubleshooting:");
    println!("1. Check if OLX structure changed");
    println!("2. Try using a VPN");
    println!("3. OLX may be using JavaScript to load content");
    println!("4. Consider a headless browser for JavaScript-heavy pages");

    println!("\n💡 Alternative solutions:");
    println!("1. Point OLX_SEARCH_URL at a different category, e.g.");
    println!("   https://www.olx.in/cars_c84/accessories_c1563");
    println!("2. Raise OLX_MAX_PAGES or OLX_MAX_ATTEMPTS");
    println!("3. Use an OLX API (if available)");
}
