use aptscope::App;
use aptscope_core::{AptError, Coordinates, Credentials, Geocoder, Result, Settings};
use aptscope_scrapers::{HogangnonoScraper, PageSource};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const SEARCH_HTML: &str = r#"
    <html><body><ul>
      <li class="apt">
        <a href="/apt/2Yk1a">
          <div class="label-container"><span class="label">래미안퍼스티지</span></div>
          <div class="desc"><span class="household">2444세대</span><span class="startDate">2009.07</span></div>
        </a>
      </li>
      <li class="apt">
        <a href="/apt/9Zz3d">
          <div class="label-container"><span class="label">아크로리버파크</span></div>
          <div class="desc"><span class="household">1612세대</span><span class="startDate">2016.08</span></div>
        </a>
      </li>
    </ul></body></html>
"#;

pub const DETAIL_HTML: &str = r#"
    <html><body>
      <div class="text-sm font-semibold text-foreground">서울 서초구 반포동 20-43</div>
      <div class="price">38억 5,000</div>
      <div class="css-yd0hrq e8116ri5">
        <div class="css-yhe5ws e8116ri4">
          <div class="css-6cu8g1 e8116ri3"><span class="css-170k1nq ei9pga10">11,250만원</span></div>
          <div class="css-6cu8g1 e8116ri3"><span class="css-170k1nq ei9pga10">9,870만원</span></div>
        </div>
        <div class="css-yhe5ws e8116ri4">
          <span class="css-1ldqlku ei9pga10">이 아파트</span>
          <span class="css-1ldqlku ei9pga10">반포동</span>
        </div>
      </div>
      <table class="css-15gqjnx e1ea9ovl5">
        <tbody>
          <tr><td>24.05.02</td><td>84</td><td><span class="css-158icaa ebmi0c75">38억 5,000</span></td></tr>
          <tr><td>24.03.18</td><td>84</td><td>37억</td></tr>
          <tr><td>24.01.09</td><td>59</td><td>27억</td></tr>
        </tbody>
      </table>
    </body></html>
"#;

/// Serves fixture pages and remembers what was asked for.
pub struct FixturePages {
    pub search: &'static str,
    pub detail: &'static str,
    pub requests: Mutex<Vec<String>>,
}

impl FixturePages {
    pub fn new(search: &'static str, detail: &'static str) -> Self {
        Self {
            search,
            detail,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PageSource for FixturePages {
    async fn search_page(&self, keyword: &str) -> Result<String> {
        self.requests.lock().unwrap().push(format!("search:{}", keyword));
        Ok(self.search.to_string())
    }

    async fn detail_page(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(format!("detail:{}", url));
        Ok(self.detail.to_string())
    }
}

pub struct FixedGeocoder(pub Option<Coordinates>);

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>> {
        Ok(self.0)
    }
}

pub struct DownGeocoder;

#[async_trait]
impl Geocoder for DownGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>> {
        Err(AptError::Scraping("geocoding service unavailable".to_string()))
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        rest_api_key: "rest-key".to_string(),
        js_key: "js-key".to_string(),
    }
}

/// Settings that never find a font and export into `output_dir`.
pub fn settings(output_dir: &Path) -> Settings {
    Settings {
        fonts: vec![output_dir.join("missing-font.ttf")],
        output_dir: output_dir.to_path_buf(),
        ..Settings::default()
    }
}

pub fn app_with(pages: Arc<FixturePages>, geocoder: Arc<dyn Geocoder>, output_dir: &Path) -> App {
    App::new(
        Arc::new(HogangnonoScraper::new(pages)),
        geocoder,
        credentials(),
        settings(output_dir),
    )
}

pub fn app(output_dir: &Path) -> App {
    app_with(
        Arc::new(FixturePages::new(SEARCH_HTML, DETAIL_HTML)),
        Arc::new(FixedGeocoder(Some(Coordinates {
            lat: 37.5079,
            lng: 126.9967,
        }))),
        output_dir,
    )
}
