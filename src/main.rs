mod config;
mod mailer;
mod models;
mod report;
mod scrapers;

use config::Config;
use mailer::Mailer;
use scrapers::{ChromeSession, ListingSource, TruliaScraper};
use std::path::Path;
use tracing::{error, info, Level};

// Query parameters embed the location, bed-count and floor-area filters
const SEARCH_URL: &str = "https://www.trulia.com/for_rent/Palestine,TX/2p_beds/2000-2500_sqft/";
const REPORT_FILENAME: &str = "weekly_real_estate_report.pdf";
const LISTINGS_FILENAME: &str = "listings.json";

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Rent Report - weekly rental listings digest");

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Credentials must be present before any network activity starts
    let config = Config::from_env()?;

    let session = ChromeSession::new()?;
    let scraper = TruliaScraper::new(session, SEARCH_URL);

    info!("Scanning {} for rental listings...", SEARCH_URL);
    let listings = scraper.fetch().await?;
    let source = scraper.source_name();

    // Shut Chrome down before formatting and mailing
    drop(scraper);

    if listings.is_empty() {
        info!("No properties found matching the criteria.");
        return Ok(());
    }

    info!("Extracted {} listings from {}", listings.len(), source);

    // Raw run artifact alongside the report, overwritten each run
    let json = serde_json::to_string_pretty(&listings)?;
    tokio::fs::write(LISTINGS_FILENAME, json).await?;
    info!("Saved listings to {}", LISTINGS_FILENAME);

    report::write_report(&listings, Path::new(REPORT_FILENAME))?;
    info!("PDF report generated: {}", REPORT_FILENAME);

    let mailer = Mailer::new(&config)?;
    mailer.send(
        "Weekly Real Estate Report",
        "Please find the attached weekly real estate report.",
        Path::new(REPORT_FILENAME),
    )?;
    info!("Report sent to {}", config.recipient);

    Ok(())
}
