//! Kakao credentials, address geocoding and the embeddable map widget.

use crate::{AptError, Result};
use async_trait::async_trait;
use maud::{html, PreEscaped};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const ADDRESS_SEARCH_URL: &str = "https://dapi.kakao.com/v2/local/search/address.json";
const MAPS_SDK_URL: &str = "//dapi.kakao.com/v2/maps/sdk.js";

pub const MAP_WIDTH: u32 = 600;
pub const MAP_HEIGHT: u32 = 400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "KAKAO_REST_API_KEY")]
    pub rest_api_key: String,
    #[serde(rename = "KAKAO_JS_KEY")]
    pub js_key: String,
}

impl Credentials {
    /// Read the credentials file. There is no fallback: callers treat an
    /// error here as fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AptError::CredentialsMissing(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AptError::InvalidCredentials(format!("{}: {}", path.display(), e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address, `Ok(None)` when the service has no match.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    #[serde(default)]
    documents: Vec<AddressDocument>,
}

#[derive(Debug, Deserialize)]
struct AddressDocument {
    x: String,
    y: String,
}

/// Pull the first match out of a Kakao address search response body.
pub fn parse_address_search(body: &str) -> Result<Option<Coordinates>> {
    let response: AddressSearchResponse = serde_json::from_str(body)?;
    let Some(first) = response.documents.into_iter().next() else {
        return Ok(None);
    };

    match (first.y.trim().parse::<f64>(), first.x.trim().parse::<f64>()) {
        (Ok(lat), Ok(lng)) => Ok(Some(Coordinates { lat, lng })),
        _ => {
            warn!("Unreadable coordinates in geocoding response: y={} x={}", first.y, first.x);
            Ok(None)
        }
    }
}

#[derive(Debug, Clone)]
pub struct KakaoGeocoder {
    client: Client,
    rest_api_key: String,
}

impl KakaoGeocoder {
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            client: Client::new(),
            rest_api_key: credentials.rest_api_key.clone(),
        }
    }
}

#[async_trait]
impl Geocoder for KakaoGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        info!("Geocoding address: {}", address);
        let body = self
            .client
            .get(ADDRESS_SEARCH_URL)
            .header("Authorization", format!("KakaoAK {}", self.rest_api_key))
            .query(&[("query", address)])
            .send()
            .await?
            .text()
            .await?;

        let coordinates = parse_address_search(&body)?;
        debug!("Geocoding result for {}: {:?}", address, coordinates);
        Ok(coordinates)
    }
}

/// A rendered map widget for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEmbed {
    pub coordinates: Coordinates,
    pub html: String,
}

impl MapEmbed {
    pub fn new(coordinates: Coordinates, js_key: &str) -> Self {
        Self {
            coordinates,
            html: map_embed_html(coordinates, js_key, MAP_WIDTH, MAP_HEIGHT),
        }
    }
}

/// HTML snippet showing a Kakao map centred on `coordinates` with a marker.
pub fn map_embed_html(coordinates: Coordinates, js_key: &str, width: u32, height: u32) -> String {
    let Coordinates { lat, lng } = coordinates;
    let script = format!(
        r#"
      var mapContainer = document.getElementById('map'),
          mapOption = {{
              center: new kakao.maps.LatLng({lat}, {lng}),
              level: 3
          }};
      var map = new kakao.maps.Map(mapContainer, mapOption);
      var markerPosition = new kakao.maps.LatLng({lat}, {lng});
      var marker = new kakao.maps.Marker({{
          position: markerPosition
      }});
      marker.setMap(map);
    "#
    );

    html! {
        div id="map" style=(format!("width:{}px;height:{}px;", width, height)) {}
        script type="text/javascript" src=(format!("{}?appkey={}", MAPS_SDK_URL, js_key)) {}
        script { (PreEscaped(script)) }
    }
    .into_string()
}
