//! City name resolution.
//!
//! A [`Geocoder`] turns a free-text city (plus an optional country hint) into
//! coordinates and an IANA time zone name. The built-in [`Gazetteer`] works
//! offline; [`OpenCageGeocoder`] queries the OpenCage API when an API key is
//! configured. [`GeocoderChain`] tries several in order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub mod gazetteer;
#[cfg(feature = "opencage")]
pub mod opencage;

pub use gazetteer::Gazetteer;
#[cfg(feature = "opencage")]
pub use opencage::OpenCageGeocoder;

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Display name of the place
    pub name: String,
    /// ISO 3166-1 alpha-2 country code
    pub country_code: String,
    /// Latitude in degrees, north positive
    pub latitude: f64,
    /// Longitude in degrees, east positive
    pub longitude: f64,
    /// IANA time zone name, e.g. `Europe/Rome`
    pub timezone: String,
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("City '{0}' could not be found")]
    NotFound(String),

    #[error("Geocoding provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Geocoding request failed: {0}")]
    Transport(String),

    #[error("Geocoding response could not be parsed: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve `city`, optionally restricted to a country code.
    async fn resolve(&self, city: &str, nation: Option<&str>) -> Result<GeoLocation, GeocodeError>;
}

/// Tries each geocoder in order and returns the first match.
///
/// A `NotFound` from one member moves on to the next; any other error is
/// returned only if no later member succeeds.
#[derive(Debug, Clone, Default)]
pub struct GeocoderChain {
    members: Vec<Arc<dyn Geocoder>>,
}

impl GeocoderChain {
    pub fn new(members: Vec<Arc<dyn Geocoder>>) -> Self {
        Self { members }
    }

    pub fn push(&mut self, geocoder: Arc<dyn Geocoder>) {
        self.members.push(geocoder);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl Geocoder for GeocoderChain {
    async fn resolve(&self, city: &str, nation: Option<&str>) -> Result<GeoLocation, GeocodeError> {
        let mut last_error = None;
        for member in &self.members {
            match member.resolve(city, nation).await {
                Ok(location) => return Ok(location),
                Err(e) => {
                    debug!(city, error = %e, "geocoder miss");
                    if !matches!(e, GeocodeError::NotFound(_)) || last_error.is_none() {
                        last_error = Some(e);
                    }
                }
            }
        }
        Err(last_error.unwrap_or_else(|| GeocodeError::NotFound(city.to_string())))
    }
}
