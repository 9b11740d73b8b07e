use crate::{AptError, Listing, ListingDetail, Result};
use tracing::info;

/// In-memory cache of the last search and the last detail fetch.
#[derive(Debug, Default)]
pub struct Session {
    keyword: Option<String>,
    results: Vec<Listing>,
    detail: Option<(Listing, ListingDetail)>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the results of a search. An empty result set leaves the
    /// previous results in place; returns whether they were replaced.
    pub fn record_search(&mut self, keyword: &str, results: Vec<Listing>) -> bool {
        if results.is_empty() {
            info!("No results for {}, keeping previous search", keyword);
            return false;
        }
        info!("Caching {} results for {}", results.len(), keyword);
        self.keyword = Some(keyword.to_string());
        self.results = results;
        true
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn results(&self) -> &[Listing] {
        &self.results
    }

    pub fn select(&self, index: usize) -> Result<&Listing> {
        self.results.get(index).ok_or_else(|| {
            AptError::InvalidSelection(format!(
                "no result #{} ({} results cached)",
                index,
                self.results.len()
            ))
        })
    }

    pub fn store_detail(&mut self, listing: Listing, detail: ListingDetail) {
        self.detail = Some((listing, detail));
    }

    pub fn detail(&self) -> Option<(&Listing, &ListingDetail)> {
        self.detail.as_ref().map(|(l, d)| (l, d))
    }
}
