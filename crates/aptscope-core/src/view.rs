use crate::display::{create_region_table, create_summary_table, create_transaction_table};
use crate::graph::{PriceTrend, RegionComparison};
use crate::map::{Geocoder, MapEmbed};
use crate::{Listing, ListingDetail};
use colored::Colorize;
use tracing::warn;

/// Parts of the dashboard, in the order they are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Transactions,
    PriceTrend,
    RegionComparison,
    Image,
    Map,
}

impl Section {
    pub const ORDER: [Section; 6] = [
        Section::Summary,
        Section::Transactions,
        Section::PriceTrend,
        Section::RegionComparison,
        Section::Image,
        Section::Map,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Transactions => "Transaction history",
            Section::PriceTrend => "Price trend by area",
            Section::RegionComparison => "Region price comparison",
            Section::Image => "Complex image",
            Section::Map => "Map",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapSection {
    NoAddress,
    NotFound { address: String },
    Failed { address: String, reason: String },
    Located { address: String, embed: MapEmbed },
}

impl MapSection {
    /// Message for the user when there is no map to show.
    pub fn warning(&self) -> Option<String> {
        match self {
            MapSection::NoAddress => None,
            MapSection::NotFound { address } => {
                Some(format!("Could not find coordinates for {}", address))
            }
            MapSection::Failed { address, reason } => {
                Some(format!("Geocoding {} failed: {}", address, reason))
            }
            MapSection::Located { .. } => None,
        }
    }
}

/// Everything the dashboard shows for one listing.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub listing: Listing,
    pub detail: ListingDetail,
    pub trend: PriceTrend,
    pub comparison: RegionComparison,
    pub map: MapSection,
}

impl DashboardView {
    pub fn new(listing: Listing, detail: ListingDetail, map: MapSection) -> Self {
        let trend = PriceTrend::from_transactions(&detail.transactions);
        let comparison = RegionComparison::from_region_prices(&detail.region_prices);
        Self {
            listing,
            detail,
            trend,
            comparison,
            map,
        }
    }

    /// Build the view, geocoding the address for the map section.
    ///
    /// A geocoding error only degrades the map section.
    pub async fn build(
        listing: Listing,
        detail: ListingDetail,
        geocoder: &dyn Geocoder,
        js_key: &str,
    ) -> Self {
        let map = match detail.address.as_deref() {
            None => MapSection::NoAddress,
            Some(address) => match geocoder.geocode(address).await {
                Ok(Some(coordinates)) => MapSection::Located {
                    address: address.to_string(),
                    embed: MapEmbed::new(coordinates, js_key),
                },
                Ok(None) => {
                    warn!("No coordinates found for {}", address);
                    MapSection::NotFound {
                        address: address.to_string(),
                    }
                }
                Err(e) => {
                    warn!("Geocoding failed for {}: {}", address, e);
                    MapSection::Failed {
                        address: address.to_string(),
                        reason: e.to_string(),
                    }
                }
            },
        };
        Self::new(listing, detail, map)
    }

    pub fn sections(&self) -> &'static [Section] {
        &Section::ORDER
    }

    pub fn render_section(&self, section: Section) -> String {
        match section {
            Section::Summary => create_summary_table(&self.listing, &self.detail),
            Section::Transactions => {
                if self.detail.transactions.is_empty() {
                    "No transactions".to_string()
                } else {
                    create_transaction_table(&self.detail.transactions)
                }
            }
            Section::PriceTrend => self.trend.to_ascii_graph(40, 5),
            Section::RegionComparison => {
                if self.detail.region_prices.is_empty() {
                    "No region price data".to_string()
                } else {
                    format!(
                        "{}\n{}",
                        create_region_table(&self.detail.region_prices),
                        self.comparison.to_ascii_bars(40)
                    )
                }
            }
            Section::Image => self
                .detail
                .image_url
                .clone()
                .unwrap_or_else(|| "No image".to_string()),
            Section::Map => match &self.map {
                MapSection::NoAddress => "No address".to_string(),
                MapSection::Located { address, embed } => format!(
                    "{} ({:.6}, {:.6})",
                    address, embed.coordinates.lat, embed.coordinates.lng
                ),
                other => other.warning().unwrap_or_default().yellow().to_string(),
            },
        }
    }

    pub fn render_terminal(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}\n", self.listing.name.bold()));

        for section in self.sections() {
            result.push_str(&format!("\n{}\n", section.title().bold().underline()));
            result.push_str(&self.render_section(*section));
            result.push('\n');
        }

        result
    }
}
