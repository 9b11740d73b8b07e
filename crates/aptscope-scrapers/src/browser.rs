use crate::PageSource;
use aptscope_core::config::BASE_URL;
use aptscope_core::{AptError, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const SEARCH_INPUT: &str = "input.keyword";
const SEARCH_INPUT_TIMEOUT: Duration = Duration::from_secs(10);
const PAGE_LOAD_WAIT: Duration = Duration::from_secs(2);
const TYPING_WAIT: Duration = Duration::from_secs(1);

fn browser_error(e: anyhow::Error) -> AptError {
    AptError::Browser(e.to_string())
}

/// Loads pages in a fresh headless Chrome per call.
///
/// The browser is torn down when the call returns, so nothing carries over
/// between searches.
#[derive(Debug, Clone)]
pub struct ChromePageSource {
    settle: Duration,
}

impl ChromePageSource {
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    fn launch() -> Result<Browser> {
        info!("Launching headless Chrome...");
        let options = LaunchOptions::default_builder()
            .headless(true)
            .args(vec![OsStr::new("--disable-gpu")])
            .build()
            .map_err(|e| AptError::Browser(e.to_string()))?;
        Browser::new(options).map_err(browser_error)
    }

    fn search_blocking(keyword: &str, settle: Duration) -> Result<String> {
        let browser = Self::launch()?;
        let tab = browser.new_tab().map_err(browser_error)?;

        let url = format!("{}/", BASE_URL);
        debug!("Opening search page {}", url);
        tab.navigate_to(&url).map_err(browser_error)?;
        tab.wait_until_navigated().map_err(browser_error)?;
        thread::sleep(PAGE_LOAD_WAIT);

        let input = tab
            .wait_for_element_with_custom_timeout(SEARCH_INPUT, SEARCH_INPUT_TIMEOUT)
            .map_err(browser_error)?;
        input.click().map_err(browser_error)?;
        input.type_into(keyword).map_err(browser_error)?;
        thread::sleep(TYPING_WAIT);
        tab.press_key("Enter").map_err(browser_error)?;
        thread::sleep(settle);

        tab.get_content().map_err(browser_error)
    }

    fn detail_blocking(url: &str, settle: Duration) -> Result<String> {
        let browser = Self::launch()?;
        let tab = browser.new_tab().map_err(browser_error)?;

        tab.navigate_to(url).map_err(browser_error)?;
        tab.wait_until_navigated().map_err(browser_error)?;
        thread::sleep(settle.max(PAGE_LOAD_WAIT));

        tab.get_content().map_err(browser_error)
    }
}

#[async_trait]
impl PageSource for ChromePageSource {
    async fn search_page(&self, keyword: &str) -> Result<String> {
        let keyword = keyword.to_string();
        let settle = self.settle;
        tokio::task::spawn_blocking(move || Self::search_blocking(&keyword, settle))
            .await
            .map_err(|e| AptError::Browser(e.to_string()))?
    }

    async fn detail_page(&self, url: &str) -> Result<String> {
        let url = url.to_string();
        let settle = self.settle;
        tokio::task::spawn_blocking(move || Self::detail_blocking(&url, settle))
            .await
            .map_err(|e| AptError::Browser(e.to_string()))?
    }
}
