pub mod browser;
pub mod hogangnono;

use aptscope_core::{Listing, ListingDetail, Result, Settings};
use async_trait::async_trait;
use std::sync::Arc;

pub use browser::ChromePageSource;
pub use hogangnono::HogangnonoScraper;

/// Enum representing the supported listing sites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScraperType {
    /// hogangnono.com - Korean apartment prices
    Hogangnono,
}

/// Source of rendered page HTML.
///
/// This is the boundary between browser automation and extraction; tests
/// put fixture HTML behind it.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Submit `keyword` on the site's search page and return the results page.
    async fn search_page(&self, keyword: &str) -> Result<String>;

    /// Load a listing detail page by absolute URL.
    async fn detail_page(&self, url: &str) -> Result<String>;
}

/// Trait for listing sites that can be searched and drilled into
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Search listings by free text.
    ///
    /// `Ok` with an empty list means the page loaded and nothing matched;
    /// a page that could not be loaded at all is an `Err`.
    async fn search(&self, keyword: &str) -> Result<Vec<Listing>>;

    /// Extract the detail facts for a listing reference (URL or site path).
    async fn detail(&self, reference: &str) -> Result<ListingDetail>;
}

/// Factory for creating scraper instances
pub struct ScraperFactory;

impl ScraperFactory {
    /// Create a scraper backed by a headless browser
    pub fn create_scraper(scraper_type: ScraperType, settings: &Settings) -> Arc<dyn ListingSource> {
        match scraper_type {
            ScraperType::Hogangnono => Arc::new(HogangnonoScraper::new(Arc::new(
                ChromePageSource::new(settings.settle_time()),
            ))),
        }
    }
}
