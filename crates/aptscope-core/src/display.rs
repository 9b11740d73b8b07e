use crate::{Listing, ListingDetail, RegionPrices, TransactionRecord};
use tabled::settings::{object::Columns, Modify, Style, Width};
use tabled::{Table, Tabled};

const MISSING: &str = "N/A";

#[derive(Tabled)]
pub struct ListingTableRow {
    #[tabled(rename = "#", display_with = "display_right_3")]
    pub index: String,
    #[tabled(rename = "Complex")]
    pub name: String,
    #[tabled(rename = "Households", display_with = "display_right_10")]
    pub household_count: String,
    #[tabled(rename = "Move-in")]
    pub move_in_date: String,
    #[tabled(rename = "Link")]
    pub reference: String,
}

#[derive(Tabled)]
pub struct SummaryTableRow {
    #[tabled(rename = "Complex")]
    pub name: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Per pyeong", display_with = "display_right_12")]
    pub price_per_area: String,
    #[tabled(rename = "1-month avg", display_with = "display_right_12")]
    pub monthly_average_price: String,
    #[tabled(rename = "Region prices")]
    pub region_prices: String,
}

#[derive(Tabled)]
pub struct TransactionTableRow {
    #[tabled(rename = "Contract date")]
    pub contract_date: String,
    #[tabled(rename = "Area (㎡)", display_with = "display_right_8")]
    pub area: String,
    #[tabled(rename = "Price", display_with = "display_right_12")]
    pub price: String,
}

#[derive(Tabled)]
pub struct RegionTableRow {
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "Per pyeong", display_with = "display_right_12")]
    pub price: String,
}

fn display_right_3(s: &str) -> String {
    format!("{:>3}", s)
}

fn display_right_8(s: &str) -> String {
    format!("{:>8}", s)
}

fn display_right_10(s: &str) -> String {
    format!("{:>10}", s)
}

fn display_right_12(s: &str) -> String {
    format!("{:>12}", s)
}

fn or_missing(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| MISSING.to_string())
}

impl ListingTableRow {
    pub fn from_listing(index: usize, listing: &Listing) -> Self {
        Self {
            index: index.to_string(),
            name: listing.name.clone(),
            household_count: listing.household_count.clone(),
            move_in_date: listing.move_in_date.clone(),
            reference: listing.reference.clone(),
        }
    }
}

impl SummaryTableRow {
    pub fn from_detail(listing: &Listing, detail: &ListingDetail) -> Self {
        let region_prices = if detail.region_prices.is_empty() {
            MISSING.to_string()
        } else {
            detail
                .region_prices
                .iter()
                .map(|(region, price)| format!("{}: {}", region, price))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            name: listing.name.clone(),
            address: or_missing(detail.address.as_ref()),
            price_per_area: or_missing(detail.price_per_area.as_ref()),
            monthly_average_price: or_missing(detail.monthly_average_price.as_ref()),
            region_prices,
        }
    }
}

impl From<&TransactionRecord> for TransactionTableRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            contract_date: record.contract_date.clone(),
            area: record.area.clone(),
            price: record.price.clone(),
        }
    }
}

pub fn create_listing_table(listings: &[Listing]) -> String {
    let rows: Vec<ListingTableRow> = listings
        .iter()
        .enumerate()
        .map(|(i, l)| ListingTableRow::from_listing(i, l))
        .collect();

    let mut table = Table::new(&rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::single(1)).with(Width::truncate(40)))
        .with(Modify::new(Columns::single(4)).with(Width::truncate(60)));

    table.to_string()
}

pub fn create_summary_table(listing: &Listing, detail: &ListingDetail) -> String {
    let rows = vec![SummaryTableRow::from_detail(listing, detail)];

    let mut table = Table::new(&rows);
    table
        .with(Style::modern())
        .with(Modify::new(Columns::single(0)).with(Width::truncate(30)))
        .with(Modify::new(Columns::single(1)).with(Width::wrap(40)))
        .with(Modify::new(Columns::single(4)).with(Width::wrap(50)));

    table.to_string()
}

pub fn create_transaction_table(transactions: &[TransactionRecord]) -> String {
    let rows: Vec<TransactionTableRow> = transactions.iter().map(Into::into).collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.to_string()
}

pub fn create_region_table(prices: &RegionPrices) -> String {
    let rows: Vec<RegionTableRow> = prices
        .iter()
        .map(|(region, price)| RegionTableRow {
            region: region.to_string(),
            price: price.to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.to_string()
}
