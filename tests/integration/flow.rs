use crate::common::{self, DownGeocoder, FixedGeocoder, FixturePages, DETAIL_HTML, SEARCH_HTML};
use aptscope_core::{MapSection, Section, Session};
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn test_search_select_and_view() {
    let dir = tempdir().unwrap();
    let app = common::app(dir.path());
    let mut session = Session::new();

    let results = app.search("반포").await.unwrap();
    assert!(session.record_search("반포", results));
    assert_eq!(session.results().len(), 2);

    let listing = session.select(1).unwrap().clone();
    assert_eq!(listing.name, "아크로리버파크");

    let detail = app.detail(&listing).await.unwrap();
    assert_eq!(detail.address.as_deref(), Some("서울 서초구 반포동 20-43"));
    assert_eq!(detail.transactions.len(), 3);
    session.store_detail(listing.clone(), detail.clone());

    let view = app.view(listing, detail).await;
    assert_eq!(view.sections(), &Section::ORDER);
    assert!(matches!(view.map, MapSection::Located { .. }));

    let areas: Vec<_> = view.trend.series.keys().cloned().collect();
    assert_eq!(areas, vec!["59".to_string(), "84".to_string()]);
    let large = &view.trend.series["84"];
    assert!(large[0].date < large[1].date);
    assert_eq!(view.comparison.bars.len(), 2);

    let rendered = view.render_terminal();
    assert!(rendered.contains("아크로리버파크"));
    assert!(rendered.contains("37.507900"));
}

#[tokio::test]
async fn test_detail_request_uses_site_url() {
    let dir = tempdir().unwrap();
    let pages = Arc::new(FixturePages::new(SEARCH_HTML, DETAIL_HTML));
    let app = common::app_with(pages.clone(), Arc::new(FixedGeocoder(None)), dir.path());

    let listings = app.search("래미안").await.unwrap();
    app.detail(&listings[0]).await.unwrap();

    let requests = pages.requests.lock().unwrap();
    assert_eq!(
        *requests,
        vec![
            "search:래미안".to_string(),
            "detail:https://hogangnono.com/apt/2Yk1a".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_empty_search_keeps_previous_results() {
    let dir = tempdir().unwrap();
    let app = common::app(dir.path());
    let empty = common::app_with(
        Arc::new(FixturePages::new("<html><body></body></html>", DETAIL_HTML)),
        Arc::new(FixedGeocoder(None)),
        dir.path(),
    );
    let mut session = Session::new();

    session.record_search("반포", app.search("반포").await.unwrap());
    let nothing = empty.search("없는아파트").await.unwrap();
    assert!(nothing.is_empty());
    assert!(!session.record_search("없는아파트", nothing));

    assert_eq!(session.keyword(), Some("반포"));
    assert_eq!(session.results().len(), 2);
}

#[tokio::test]
async fn test_blank_detail_page_still_renders() {
    let dir = tempdir().unwrap();
    let app = common::app_with(
        Arc::new(FixturePages::new(SEARCH_HTML, "<html><body></body></html>")),
        Arc::new(FixedGeocoder(None)),
        dir.path(),
    );

    let listings = app.search("반포").await.unwrap();
    let detail = app.detail(&listings[0]).await.unwrap();
    assert!(detail.is_empty());

    let view = app.view(listings[0].clone(), detail).await;
    assert_eq!(view.map, MapSection::NoAddress);
    assert!(view.trend.is_empty());
    assert!(view.comparison.is_empty());

    let rendered = view.render_terminal();
    assert!(rendered.contains("No transactions"));
    assert!(rendered.contains("No image"));
}

#[tokio::test]
async fn test_geocoding_failure_only_affects_map() {
    let dir = tempdir().unwrap();
    let app = common::app_with(
        Arc::new(FixturePages::new(SEARCH_HTML, DETAIL_HTML)),
        Arc::new(DownGeocoder),
        dir.path(),
    );

    let listings = app.search("반포").await.unwrap();
    let detail = app.detail(&listings[0]).await.unwrap();
    let view = app.view(listings[0].clone(), detail).await;

    assert!(matches!(view.map, MapSection::Failed { .. }));
    assert!(view.map.warning().unwrap().contains("geocoding service unavailable"));
    assert!(!view.trend.is_empty());
    assert_eq!(view.detail.transactions.len(), 3);
}
