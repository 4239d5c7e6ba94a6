use crate::scrapers::traits::PageSession;
use anyhow::{anyhow, Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Fixed delay after scrolling so lazy-loaded cards have time to render.
const SCROLL_SETTLE: Duration = Duration::from_secs(2);

const USER_AGENT_ARG: &str = "--user-agent=Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/86.0.4240.183 Safari/537.36";

/// Headless Chrome page session
///
/// The sole production implementation of [`PageSession`]. The browser
/// process is owned exclusively by this struct and shut down when it drops,
/// on success and failure paths alike.
pub struct ChromeSession {
    // Keeps the Chrome process alive for as long as the tab is in use
    #[allow(dead_code)]
    browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launch headless Chrome with a spoofed user-agent and the usual
    /// headless-compatibility flags (no GPU, no sandbox)
    pub fn new() -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((1920, 1080)))
            .args(vec![
                OsStr::new("--disable-gpu"),
                OsStr::new("--ignore-certificate-errors"),
                OsStr::new("--disable-webgl"),
                OsStr::new(USER_AGENT_ARG),
            ])
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        Ok(Self { browser, tab })
    }
}

impl PageSession for ChromeSession {
    fn navigate(&self, url: &str) -> Result<()> {
        info!("Navigating to URL: {}", url);
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.tab
            .wait_until_navigated()
            .context("Navigation did not complete")?;
        Ok(())
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        info!("Waiting for listings to load...");
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .with_context(|| format!("Timed out waiting for '{selector}'"))?;
        Ok(())
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        self.tab
            .evaluate("window.scrollTo(0, document.body.scrollHeight);", false)
            .context("Failed to scroll page")?;
        thread::sleep(SCROLL_SETTLE);
        Ok(())
    }

    fn snapshot(&self) -> Result<String> {
        let result = self
            .tab
            .evaluate("document.documentElement.outerHTML", false)
            .context("Failed to capture page HTML")?;

        let html = result
            .value
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Page snapshot returned no HTML"))?;

        Ok(html)
    }
}
