pub mod browser;
pub mod traits;
pub mod trulia;

pub use browser::ChromeSession;
pub use traits::{ListingSource, PageSession};
pub use trulia::TruliaScraper;
