use crate::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const BASE_URL: &str = "https://hogangnono.com";

/// Font files tried in order when a report needs Hangul glyphs.
pub const DEFAULT_FONT_PATHS: &[&str] = &[
    "C:/Windows/Fonts/malgun.ttf",
    "./fonts/NanumGothic.ttf",
    "./NanumGothic.ttf",
];

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Kakao credentials file (-k, --credentials)
    #[arg(short = 'k', long, global = true, default_value = "kakao_keys.json")]
    pub credentials: PathBuf,

    /// Font file for reports, tried in the order given (-F, --font)
    #[arg(short = 'F', long = "font", global = true)]
    pub fonts: Vec<PathBuf>,

    /// Directory for exported reports (-O, --output-dir)
    #[arg(short = 'O', long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Seconds to let the page render after each browser action (-w, --settle-secs)
    #[arg(short = 'w', long, global = true, default_value_t = 3)]
    pub settle_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("kakao_keys.json"),
            fonts: Vec::new(),
            output_dir: PathBuf::from("."),
            settle_secs: 3,
        }
    }
}

impl Settings {
    pub fn font_search_paths(&self) -> Vec<PathBuf> {
        if self.fonts.is_empty() {
            DEFAULT_FONT_PATHS.iter().map(PathBuf::from).collect()
        } else {
            self.fonts.clone()
        }
    }

    /// First font in the search list that exists on disk.
    pub fn find_font(&self) -> Option<PathBuf> {
        find_first_existing(&self.font_search_paths())
    }

    pub fn settle_time(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

fn find_first_existing(paths: &[PathBuf]) -> Option<PathBuf> {
    paths
        .iter()
        .find(|path| {
            let found = Path::new(path).is_file();
            debug!("Font candidate {}: {}", path.display(), found);
            found
        })
        .cloned()
}

/// Resolve a listing reference against the site root. Absolute URLs pass
/// through unchanged.
pub fn detail_url(reference: &str) -> Result<String> {
    let url = Url::parse(BASE_URL)?.join(reference.trim())?;
    Ok(url.to_string())
}
