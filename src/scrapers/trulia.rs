use crate::models::{Listing, UNAVAILABLE};
use crate::scrapers::traits::{ListingSource, PageSession};
use anyhow::{bail, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Marker attributes the target site stamps on its listing markup. These are
/// an external contract: if Trulia changes its data-testid values, extraction
/// silently finds zero cards.
const CARD_SELECTOR: &str = r#"div[data-testid="home-card-rent"]"#;
const ADDRESS_SELECTOR: &str = r#"div[data-testid="property-address"]"#;
const PRICE_SELECTOR: &str = r#"div[data-testid="property-price"]"#;
const BEDS_SELECTOR: &str = r#"div[data-testid="property-beds"]"#;
const BATHS_SELECTOR: &str = r#"div[data-testid="property-baths"]"#;
const SQFT_SELECTOR: &str = r#"div[data-testid="property-floorSpace"]"#;
const LINK_SELECTOR: &str = r#"a[data-testid="property-card-link"]"#;

const BASE_URL: &str = "https://www.trulia.com";

/// How long to wait for the first listing card before giving up.
const LISTING_WAIT: Duration = Duration::from_secs(30);

/// Trulia rental-listings scraper over any page session
pub struct TruliaScraper<S: PageSession> {
    session: S,
    url: String,
}

impl<S: PageSession> TruliaScraper<S> {
    pub fn new(session: S, url: impl Into<String>) -> Self {
        Self {
            session,
            url: url.into(),
        }
    }

    /// Capture the rendered search-results page and extract all listings
    pub fn scrape(&self) -> Result<Vec<Listing>> {
        self.session.navigate(&self.url)?;
        self.session.wait_for(CARD_SELECTOR, LISTING_WAIT)?;
        info!("Listings loaded.");

        // One scroll picks up cards the site defers until they enter view
        self.session.scroll_to_bottom()?;

        let html = self.session.snapshot()?;
        Ok(extract_listings(&html))
    }
}

#[async_trait]
impl<S: PageSession + Send + Sync> ListingSource for TruliaScraper<S> {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        self.scrape()
    }

    fn source_name(&self) -> &'static str {
        "trulia"
    }
}

/// Extract every listing card from rendered markup, in DOM order.
///
/// A card missing a field node gets the sentinel for that field; a card with
/// malformed markup is logged and skipped without aborting the batch.
pub fn extract_listings(html: &str) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(CARD_SELECTOR).unwrap();

    let cards: Vec<_> = document.select(&card_selector).collect();
    info!("Found {} listings.", cards.len());

    let mut listings = Vec::new();

    for (idx, card) in cards.iter().enumerate() {
        match extract_card(card) {
            Ok(listing) => {
                debug!("Extracted listing {}: {}", idx, listing.address);
                listings.push(listing);
            }
            Err(e) => {
                warn!("Error parsing listing {}: {}", idx, e);
            }
        }
    }

    listings
}

fn extract_card(card: &ElementRef) -> Result<Listing> {
    let address_selector = Selector::parse(ADDRESS_SELECTOR).unwrap();
    let price_selector = Selector::parse(PRICE_SELECTOR).unwrap();
    let beds_selector = Selector::parse(BEDS_SELECTOR).unwrap();
    let baths_selector = Selector::parse(BATHS_SELECTOR).unwrap();
    let sqft_selector = Selector::parse(SQFT_SELECTOR).unwrap();
    let link_selector = Selector::parse(LINK_SELECTOR).unwrap();

    // An anchor without an href is malformed markup, not a missing field
    let link = match card.select(&link_selector).next() {
        Some(anchor) => match anchor.value().attr("href") {
            Some(href) => format!("{BASE_URL}{href}"),
            None => bail!("card link anchor has no href"),
        },
        None => UNAVAILABLE.to_string(),
    };

    Ok(Listing {
        address: field_text(card, &address_selector),
        price: field_text(card, &price_selector),
        beds: field_text(card, &beds_selector),
        baths: field_text(card, &baths_selector),
        sqft: field_text(card, &sqft_selector),
        link,
    })
}

/// Text of the first node matching `selector`, whitespace-collapsed, or the
/// sentinel when the node is absent.
fn field_text(card: &ElementRef, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|el| {
            el.text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(inner: &str) -> String {
        format!(r#"<div data-testid="home-card-rent">{inner}</div>"#)
    }

    const FULL_CARD: &str = r#"
        <div data-testid="property-address"><span>123 Main St,</span> <span>Palestine, TX</span></div>
        <div data-testid="property-price">$1,250/mo</div>
        <div data-testid="property-beds">3bd</div>
        <div data-testid="property-baths">2ba</div>
        <div data-testid="property-floorSpace">2,100 sqft</div>
        <a data-testid="property-card-link" href="/p/tx/palestine/123-main-st/1001">view</a>
    "#;

    #[test]
    fn extracts_all_fields_from_complete_card() {
        let html = card(FULL_CARD);
        let listings = extract_listings(&html);

        assert_eq!(listings.len(), 1);
        let l = &listings[0];
        assert_eq!(l.address, "123 Main St, Palestine, TX");
        assert_eq!(l.price, "$1,250/mo");
        assert_eq!(l.beds, "3bd");
        assert_eq!(l.baths, "2ba");
        assert_eq!(l.sqft, "2,100 sqft");
        assert_eq!(
            l.link,
            "https://www.trulia.com/p/tx/palestine/123-main-st/1001"
        );
    }

    #[test]
    fn missing_field_nodes_resolve_to_sentinel() {
        let html = card(r#"<div data-testid="property-address">456 Oak Ave</div>"#);
        let listings = extract_listings(&html);

        assert_eq!(listings.len(), 1);
        let l = &listings[0];
        assert_eq!(l.address, "456 Oak Ave");
        assert_eq!(l.price, UNAVAILABLE);
        assert_eq!(l.beds, UNAVAILABLE);
        assert_eq!(l.baths, UNAVAILABLE);
        assert_eq!(l.sqft, UNAVAILABLE);
        assert_eq!(l.link, UNAVAILABLE);
    }

    #[test]
    fn empty_field_node_resolves_to_sentinel() {
        let html = card(r#"<div data-testid="property-price">  </div>"#);
        let listings = extract_listings(&html);
        assert_eq!(listings[0].price, UNAVAILABLE);
    }

    #[test]
    fn no_cards_yields_empty_batch() {
        let html = "<html><body><div class=\"unrelated\">nothing here</div></body></html>";
        assert!(extract_listings(html).is_empty());
    }

    #[test]
    fn anchor_without_href_skips_card_but_not_siblings() {
        let html = format!(
            "{}{}{}",
            card(r#"<div data-testid="property-address">1 First St</div>"#),
            card(r#"<a data-testid="property-card-link">broken</a>"#),
            card(r#"<div data-testid="property-address">3 Third St</div>"#),
        );
        let listings = extract_listings(&html);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].address, "1 First St");
        assert_eq!(listings[1].address, "3 Third St");
    }

    #[test]
    fn preserves_dom_order() {
        let html = format!(
            "{}{}",
            card(r#"<div data-testid="property-address">A</div>"#),
            card(r#"<div data-testid="property-address">B</div>"#),
        );
        let listings = extract_listings(&html);
        assert_eq!(listings[0].address, "A");
        assert_eq!(listings[1].address, "B");
    }
}
