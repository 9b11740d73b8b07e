use crate::common;
use aptscope_core::{
    Listing, ListingDetail, RegionPrices, ReportBuilder, ReportInput, TransactionRecord,
    REPORT_PAGE_COUNT,
};
use std::fs;
use tempfile::tempdir;

fn ascii_listing() -> (Listing, ListingDetail) {
    let listing = Listing {
        name: "Raemian Firstige".to_string(),
        household_count: "2444".to_string(),
        move_in_date: "2009.07".to_string(),
        reference: "/apt/2Yk1a".to_string(),
    };
    let detail = ListingDetail {
        address: Some("Banpo-dong 20-43, Seocho-gu, Seoul".to_string()),
        price_per_area: Some("11,250".to_string()),
        monthly_average_price: Some("3,850,000,000".to_string()),
        transactions: vec![
            TransactionRecord::new("24.05.02", "84", "385000"),
            TransactionRecord::new("24.03.18", "84", "370000"),
            TransactionRecord::new("24.01.09", "59", "270000"),
        ],
        region_prices: RegionPrices::new(),
        image_url: None,
    };
    (listing, detail)
}

#[tokio::test]
async fn test_export_writes_pdf_into_output_dir() {
    let dir = tempdir().unwrap();
    let app = common::app(dir.path());
    let (listing, detail) = ascii_listing();

    let path = app.export(&listing, &detail).await.unwrap();

    assert_eq!(path.parent(), Some(dir.path()));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("apt_detail_") && name.ends_with(".pdf"));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_export_creates_missing_output_dir() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("reports").join("2024");
    let app = common::app(&nested);
    let (listing, detail) = ascii_listing();

    let path = app.export(&listing, &detail).await.unwrap();
    assert!(path.starts_with(&nested));
    assert!(path.is_file());
}

#[test]
fn test_report_is_three_pages_with_or_without_data() {
    let (listing, detail) = ascii_listing();
    let builder = ReportBuilder::new(None);

    let full = builder
        .render(&ReportInput {
            listing: &listing,
            detail: &detail,
            image: None,
        })
        .unwrap();
    assert_eq!(full.page_count(), REPORT_PAGE_COUNT);
    assert!(!full.has_hangul_font());

    let empty = ListingDetail::default();
    let bare = builder
        .render(&ReportInput {
            listing: &listing,
            detail: &empty,
            image: None,
        })
        .unwrap();
    assert_eq!(bare.page_count(), REPORT_PAGE_COUNT);
}

#[tokio::test]
async fn test_html_and_csv_from_scraped_detail() {
    let dir = tempdir().unwrap();
    let app = common::app(dir.path());

    let listings = app.search("반포").await.unwrap();
    let detail = app.detail(&listings[0]).await.unwrap();
    let view = app.view(listings[0].clone(), detail.clone()).await;

    let html_path = dir.path().join("dashboard.html");
    app.write_html(&view, &html_path).unwrap();
    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("래미안퍼스티지"));
    assert!(html.contains("서울 서초구 반포동 20-43"));
    assert!(html.contains("js-key"));

    let csv_path = dir.path().join("deals.csv");
    app.write_csv(&detail, &csv_path).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("contract_date,contract_day,area,price"));
    assert!(lines[1].starts_with("24.05.02,2024-05-02,84,"));
}
