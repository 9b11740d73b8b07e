use aptscope_core::export::write_transactions_csv;
use aptscope_core::report::fetch_image;
use aptscope_core::{
    render_dashboard_html, Credentials, DashboardView, Geocoder, Listing, ListingDetail,
    ReportBuilder, ReportInput, Result, Settings,
};
use aptscope_scrapers::ListingSource;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a command needs: the listing source, geocoding and settings.
pub struct App {
    pub source: Arc<dyn ListingSource>,
    pub geocoder: Arc<dyn Geocoder>,
    pub credentials: Credentials,
    pub settings: Settings,
    client: Client,
}

impl App {
    pub fn new(
        source: Arc<dyn ListingSource>,
        geocoder: Arc<dyn Geocoder>,
        credentials: Credentials,
        settings: Settings,
    ) -> Self {
        Self {
            source,
            geocoder,
            credentials,
            settings,
            client: Client::new(),
        }
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<Listing>> {
        self.source.search(keyword).await
    }

    pub async fn detail(&self, listing: &Listing) -> Result<ListingDetail> {
        self.source.detail(&listing.reference).await
    }

    pub async fn view(&self, listing: Listing, detail: ListingDetail) -> DashboardView {
        DashboardView::build(listing, detail, self.geocoder.as_ref(), &self.credentials.js_key).await
    }

    pub fn write_html(&self, view: &DashboardView, path: &Path) -> Result<()> {
        fs::write(path, render_dashboard_html(view))?;
        info!("Wrote dashboard to {}", path.display());
        Ok(())
    }

    pub fn write_csv(&self, detail: &ListingDetail, path: &Path) -> Result<()> {
        write_transactions_csv(path, &detail.transactions)
    }

    /// Export the three page report. An image that cannot be fetched leaves
    /// the image page blank.
    pub async fn export(&self, listing: &Listing, detail: &ListingDetail) -> Result<PathBuf> {
        let image = match &detail.image_url {
            Some(url) => match fetch_image(&self.client, url).await {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!("Could not fetch image {}: {}", url, e);
                    None
                }
            },
            None => None,
        };

        fs::create_dir_all(&self.settings.output_dir)?;
        let input = ReportInput {
            listing,
            detail,
            image: image.as_ref(),
        };
        ReportBuilder::from_settings(&self.settings).export(&input, &self.settings.output_dir)
    }
}
