use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Minimal browser capability needed to capture a rendered listings page.
///
/// The production implementation drives headless Chrome; tests substitute a
/// static-fixture session so the extraction logic runs without a browser.
pub trait PageSession {
    /// Navigate to the given URL and block until the load commits
    fn navigate(&self, url: &str) -> Result<()>;

    /// Block until an element matching `selector` is present, or time out
    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Scroll to the bottom of the page and give lazy content time to load
    fn scroll_to_bottom(&self) -> Result<()>;

    /// Return the rendered markup of the current page
    fn snapshot(&self) -> Result<String>;
}

/// Common trait for all listing scrapers
/// This allows easy addition of new sources (Zillow, Realtor, etc) in the future
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch listings from the source
    async fn fetch(&self) -> Result<Vec<Listing>>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
