use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AptError {
    #[error("Scraping error: {0}")]
    Scraping(String),
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Credentials file not found: {0}")]
    CredentialsMissing(PathBuf),
    #[error("Invalid credentials file: {0}")]
    InvalidCredentials(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

pub type Result<T> = std::result::Result<T, AptError>;
