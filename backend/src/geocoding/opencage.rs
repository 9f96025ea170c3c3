use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{GeoLocation, GeocodeError, Geocoder};

pub const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

/// Forward geocoding through the OpenCage API.
#[derive(Debug, Clone)]
pub struct OpenCageGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenCageGeocoder {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OcResponse {
    #[serde(default)]
    results: Vec<OcResult>,
}

#[derive(Debug, Deserialize)]
struct OcResult {
    formatted: String,
    geometry: OcGeometry,
    #[serde(default)]
    components: OcComponents,
    annotations: Option<OcAnnotations>,
}

#[derive(Debug, Deserialize)]
struct OcGeometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OcComponents {
    #[serde(rename = "ISO_3166-1_alpha-2")]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcAnnotations {
    timezone: Option<OcTimezone>,
}

#[derive(Debug, Deserialize)]
struct OcTimezone {
    name: String,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

/// Pick the first result that carries a time zone.
fn parse_response(city: &str, body: &str) -> Result<GeoLocation, GeocodeError> {
    let parsed: OcResponse =
        serde_json::from_str(body).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    parsed
        .results
        .into_iter()
        .find_map(|r| {
            let timezone = r.annotations?.timezone?.name;
            Some(GeoLocation {
                name: r.formatted,
                country_code: r.components.country_code.unwrap_or_default().to_uppercase(),
                latitude: r.geometry.lat,
                longitude: r.geometry.lng,
                timezone,
            })
        })
        .ok_or_else(|| GeocodeError::NotFound(city.to_string()))
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn resolve(&self, city: &str, nation: Option<&str>) -> Result<GeoLocation, GeocodeError> {
        let mut query = vec![
            ("q", city.to_string()),
            ("key", self.api_key.clone()),
            ("limit", "1".to_string()),
            ("no_record", "1".to_string()),
        ];
        if let Some(code) = nation.filter(|n| !n.trim().is_empty()) {
            query.push(("countrycode", code.trim().to_lowercase()));
        }

        let res = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(GeocodeError::Provider {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_response(city, &body)
    }
}
