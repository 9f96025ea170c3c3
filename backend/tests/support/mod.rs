#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use astro_chart::geocoding::{GeoLocation, GeocodeError, Geocoder};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Geocoder that knows exactly one place and never touches the network.
#[derive(Debug, Clone)]
pub struct StubGeocoder {
    pub location: GeoLocation,
}

impl StubGeocoder {
    pub fn new(name: &str, latitude: f64, longitude: f64, timezone: &str) -> Self {
        Self {
            location: GeoLocation {
                name: name.to_string(),
                country_code: "XX".to_string(),
                latitude,
                longitude,
                timezone: timezone.to_string(),
            },
        }
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, city: &str, _nation: Option<&str>) -> Result<GeoLocation, GeocodeError> {
        if city.eq_ignore_ascii_case(&self.location.name) {
            Ok(self.location.clone())
        } else {
            Err(GeocodeError::NotFound(city.to_string()))
        }
    }
}

/// Send a GET through the router and return status, content type and body.
#[cfg(feature = "http-server")]
pub async fn get(
    app: axum::Router,
    uri: &str,
) -> (axum::http::StatusCode, Option<String>, String) {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Like [`get`], parsing the body as JSON.
#[cfg(feature = "http-server")]
pub async fn get_json(app: axum::Router, uri: &str) -> (axum::http::StatusCode, serde_json::Value) {
    let (status, _, body) = get(app, uri).await;
    let json = serde_json::from_str(&body).unwrap_or_else(|e| panic!("not JSON ({e}): {body}"));
    (status, json)
}
