use serde::{Deserialize, Serialize};

pub mod config;
mod display;
mod error;
pub mod export;
mod graph;
mod html;
pub mod map;
pub mod price;
pub mod report;
mod session;
mod view;

pub use config::Settings;
pub use display::{
    create_listing_table, create_region_table, create_summary_table, create_transaction_table,
    ListingTableRow, RegionTableRow, SummaryTableRow, TransactionTableRow,
};
pub use error::{AptError, Result};
pub use graph::{PricePoint, PriceTrend, RegionBar, RegionComparison};
pub use html::render_dashboard_html;
pub use map::{Coordinates, Credentials, Geocoder, KakaoGeocoder, MapEmbed};
pub use price::{parse_contract_date, price_to_num, region_price_man_won};
pub use report::{ReportBuilder, ReportInput, REPORT_PAGE_COUNT};
pub use session::Session;
pub use view::{DashboardView, MapSection, Section};

/// One row of the search result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub name: String,
    pub household_count: String,
    pub move_in_date: String,
    /// Absolute URL or a site-relative path such as `/apt/1a2b3`.
    pub reference: String,
}

/// One row of a listing's transaction history table, kept as scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub contract_date: String,
    pub area: String,
    pub price: String,
}

impl TransactionRecord {
    pub fn new(
        contract_date: impl Into<String>,
        area: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            contract_date: contract_date.into(),
            area: area.into(),
            price: price.into(),
        }
    }

    pub fn price_value(&self) -> Option<u64> {
        price_to_num(&self.price)
    }

    pub fn contract_day(&self) -> Option<chrono::NaiveDate> {
        parse_contract_date(&self.contract_date)
    }
}

/// Region name to price-per-pyeong text, in page order.
///
/// Inserting a name that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPrices(Vec<(String, String)>);

impl RegionPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region: impl Into<String>, price: impl Into<String>) {
        let region = region.into();
        let price = price.into();
        match self.0.iter_mut().find(|(name, _)| *name == region) {
            Some(entry) => entry.1 = price,
            None => self.0.push((region, price)),
        }
    }

    pub fn get(&self, region: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == region)
            .map(|(_, price)| price.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(r, p)| (r.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<R: Into<String>, P: Into<String>> FromIterator<(R, P)> for RegionPrices {
    fn from_iter<I: IntoIterator<Item = (R, P)>>(iter: I) -> Self {
        let mut prices = RegionPrices::new();
        for (region, price) in iter {
            prices.insert(region, price);
        }
        prices
    }
}

/// Facts gathered from a single listing's detail page.
///
/// Every field is best effort: a selector that no longer matches leaves its
/// field empty without affecting the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetail {
    pub address: Option<String>,
    pub price_per_area: Option<String>,
    pub monthly_average_price: Option<String>,
    pub transactions: Vec<TransactionRecord>,
    pub region_prices: RegionPrices,
    pub image_url: Option<String>,
}

impl ListingDetail {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.price_per_area.is_none()
            && self.monthly_average_price.is_none()
            && self.transactions.is_empty()
            && self.region_prices.is_empty()
            && self.image_url.is_none()
    }
}
