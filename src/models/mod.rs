use serde::{Deserialize, Serialize};

/// Placeholder used when a listing card is missing a field's markup node.
pub const UNAVAILABLE: &str = "N/A";

/// One rental listing as extracted from the search-results page.
///
/// Fields stay free-text: the site renders prices, bed counts and floor
/// areas in inconsistent formats, and the report prints them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub address: String,
    pub price: String,
    pub beds: String,
    pub baths: String,
    pub sqft: String,
    pub link: String,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            address: UNAVAILABLE.to_string(),
            price: UNAVAILABLE.to_string(),
            beds: UNAVAILABLE.to_string(),
            baths: UNAVAILABLE.to_string(),
            sqft: UNAVAILABLE.to_string(),
            link: UNAVAILABLE.to_string(),
        }
    }
}
