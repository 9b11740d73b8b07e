use crate::{ListingSource, PageSource};
use aptscope_core::config::detail_url;
use aptscope_core::{AptError, Listing, ListingDetail, RegionPrices, Result, TransactionRecord};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, warn};

const LISTING_ROW: &str = "li.apt";
const LISTING_NAME: &str = ".label-container .label";
const LISTING_HOUSEHOLD: &str = ".desc .household";
const LISTING_START_DATE: &str = ".desc .startDate";
const LISTING_LINK: &str = "a";

const ADDRESS: &str = "div.text-sm.font-semibold.text-foreground";
const PRICE_BLOCKS: &str = "div.css-yd0hrq.e8116ri5 > div.css-yhe5ws.e8116ri4";
const PRICE_VALUE: &str = "div.css-6cu8g1.e8116ri3 span.css-170k1nq.ei9pga10";
const REGION_NAME: &str = "span.css-1ldqlku.ei9pga10";
const MONTHLY_AVERAGE: &str = "div.price";
const DEAL_ROWS: &str = "table.css-15gqjnx.e1ea9ovl5 > tbody > tr";
const DEAL_CELL: &str = "td";
const DEAL_PRICE: &str = "span.css-158icaa.ebmi0c75";
const IMAGE: &str = "div.img-wrapper img";

pub struct HogangnonoScraper {
    pages: Arc<dyn PageSource>,
}

impl HogangnonoScraper {
    pub fn new(pages: Arc<dyn PageSource>) -> Self {
        Self { pages }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AptError::Scraping(format!("{}: {}", selector, e)))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn first_text(scope: ElementRef, selector: &str) -> Result<String> {
    let parsed = parse_selector(selector)?;
    scope
        .select(&parsed)
        .next()
        .map(element_text)
        .ok_or_else(|| AptError::Scraping(format!("no element matches {}", selector)))
}

fn all_texts(scope: ElementRef, selector: &str) -> Result<Vec<String>> {
    let selector = parse_selector(selector)?;
    Ok(scope
        .select(&selector)
        .map(|el| element_text(el).trim().to_string())
        .collect())
}

/// Run one field extractor, turning a failure into an absent value.
fn field<T>(name: &str, extract: impl FnOnce() -> Result<Option<T>>) -> Option<T> {
    match extract() {
        Ok(value) => {
            if value.is_none() {
                debug!("Field {} not present", name);
            }
            value
        }
        Err(e) => {
            debug!("Field {} could not be extracted: {}", name, e);
            None
        }
    }
}

fn parse_listing_row(row: ElementRef) -> Result<Listing> {
    let name = first_text(row, LISTING_NAME)?.replace('\n', "");
    let household_count = first_text(row, LISTING_HOUSEHOLD)?;
    let move_in_date = first_text(row, LISTING_START_DATE)?;

    let link = parse_selector(LISTING_LINK)?;
    let reference = row
        .select(&link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| AptError::Scraping("row has no link".to_string()))?
        .to_string();

    Ok(Listing {
        name: name.trim().to_string(),
        household_count: household_count.trim().to_string(),
        move_in_date: move_in_date.trim().to_string(),
        reference,
    })
}

/// Extract every complete result row from a rendered search page.
///
/// Rows missing any field are skipped.
pub fn parse_search_results(html: &str) -> Result<Vec<Listing>> {
    let document = Html::parse_document(html);
    let row_selector = parse_selector(LISTING_ROW)?;

    let mut listings = Vec::new();
    let mut skipped = 0;
    for (i, row) in document.select(&row_selector).enumerate() {
        match parse_listing_row(row) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                debug!("Skipping result row {}: {}", i, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} incomplete result rows", skipped);
    }
    Ok(listings)
}

fn price_blocks(document: &Html) -> Result<Vec<ElementRef<'_>>> {
    let selector = parse_selector(PRICE_BLOCKS)?;
    Ok(document.select(&selector).collect())
}

fn extract_address(document: &Html) -> Result<Option<String>> {
    first_text(document.root_element(), ADDRESS).map(|text| Some(text.trim().to_string()))
}

fn extract_price_per_area(document: &Html) -> Result<Option<String>> {
    let blocks = price_blocks(document)?;
    if blocks.len() < 2 {
        return Ok(None);
    }
    first_text(blocks[0], PRICE_VALUE).map(|text| Some(text.trim().to_string()))
}

fn extract_monthly_average(document: &Html) -> Result<Option<String>> {
    first_text(document.root_element(), MONTHLY_AVERAGE).map(|text| Some(text.trim().to_string()))
}

fn extract_transactions(document: &Html) -> Result<Vec<TransactionRecord>> {
    let rows = parse_selector(DEAL_ROWS)?;
    let cell = parse_selector(DEAL_CELL)?;
    let price_span = parse_selector(DEAL_PRICE)?;

    let mut deals = Vec::new();
    for row in document.select(&rows) {
        let cells: Vec<ElementRef> = row.select(&cell).collect();
        if cells.len() < 3 {
            continue;
        }
        let price = match cells[2].select(&price_span).last() {
            Some(span) => element_text(span),
            None => element_text(cells[2]),
        };
        deals.push(TransactionRecord::new(
            element_text(cells[0]).trim(),
            element_text(cells[1]).trim(),
            price.trim(),
        ));
    }
    Ok(deals)
}

fn extract_region_prices(document: &Html) -> Result<RegionPrices> {
    let blocks = price_blocks(document)?;
    if blocks.len() < 2 {
        return Ok(RegionPrices::new());
    }
    let prices = all_texts(blocks[0], PRICE_VALUE)?;
    let regions = all_texts(blocks[1], REGION_NAME)?;
    Ok(regions.into_iter().zip(prices).collect())
}

fn extract_image_url(document: &Html) -> Result<Option<String>> {
    let selector = parse_selector(IMAGE)?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string))
}

/// Extract a listing detail page. Each field is independent of the others.
pub fn parse_detail(html: &str) -> ListingDetail {
    let document = Html::parse_document(html);

    ListingDetail {
        address: field("address", || extract_address(&document)),
        price_per_area: field("price_per_area", || extract_price_per_area(&document)),
        monthly_average_price: field("monthly_average_price", || extract_monthly_average(&document)),
        transactions: field("transactions", || extract_transactions(&document).map(Some))
            .unwrap_or_default(),
        region_prices: field("region_prices", || extract_region_prices(&document).map(Some))
            .unwrap_or_default(),
        image_url: field("image_url", || extract_image_url(&document)),
    }
}

#[async_trait]
impl ListingSource for HogangnonoScraper {
    async fn search(&self, keyword: &str) -> Result<Vec<Listing>> {
        info!("Searching hogangnono for {}", keyword);
        let html = self.pages.search_page(keyword).await?;
        let listings = parse_search_results(&html)?;
        info!("Found {} listings for {}", listings.len(), keyword);
        Ok(listings)
    }

    async fn detail(&self, reference: &str) -> Result<ListingDetail> {
        let url = detail_url(reference)?;
        info!("Scraping detail page: {}", url);
        let html = self.pages.detail_page(&url).await?;
        let detail = parse_detail(&html);
        debug!(
            "Detail for {}: address={:?}, {} transactions, {} regions",
            url,
            detail.address,
            detail.transactions.len(),
            detail.region_prices.len()
        );
        Ok(detail)
    }
}
