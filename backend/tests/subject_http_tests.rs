#![cfg(feature = "http-server")]

mod support;

use async_trait::async_trait;
use axum::http::StatusCode;
use std::sync::Arc;

use astro_chart::config::ChartSettings;
use astro_chart::geocoding::{GeoLocation, GeocodeError, Geocoder, Gazetteer};
use astro_chart::http::create_subject_router;

use support::StubGeocoder;

const FRIDA: &str = "/natal_chart?name=Frida&year=1907&month=7&day=6&hour=8&minute=30&city=Coyoacan";

fn app() -> axum::Router {
    let geocoder = StubGeocoder::new("Coyoacan", 19.3467, -99.1617, "America/Mexico_City");
    create_subject_router(Arc::new(geocoder), ChartSettings::default())
}

#[derive(Debug)]
struct PanickingGeocoder;

#[async_trait]
impl Geocoder for PanickingGeocoder {
    async fn resolve(&self, _city: &str, _nation: Option<&str>) -> Result<GeoLocation, GeocodeError> {
        panic!("geocoder exploded");
    }
}

#[tokio::test]
async fn test_root_is_plain_text() {
    let (status, _, body) = support::get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_health_names_service() {
    let (status, json) = support::get_json(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["service"], "subject");
}

#[tokio::test]
async fn test_subject_payload() {
    let (status, json) = support::get_json(app(), FRIDA).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Frida");
    assert_eq!(json["city"], "Coyoacan");
    assert_eq!(json["tz_str"], "America/Mexico_City");
    assert_eq!(json["zodiac_type"], "Tropic");
    assert_eq!(json["houses_system"], "Placidus");

    for planet in ["sun", "moon", "mercury", "venus", "mars", "jupiter", "saturn", "uranus", "neptune", "pluto"] {
        let point = &json[planet];
        assert_eq!(point["point_type"], "Planet", "{planet}");
        let abs_pos = point["abs_pos"].as_f64().unwrap();
        let sign_num = point["sign_num"].as_u64().unwrap();
        assert_eq!(sign_num, (abs_pos / 30.0).floor() as u64, "{planet}");
    }
    for house in ["first_house", "fourth_house", "seventh_house", "tenth_house", "twelfth_house"] {
        assert_eq!(json[house]["point_type"], "House", "{house}");
    }

    let phase = json["lunar_phase"]["moon_phase"].as_u64().unwrap();
    assert!((1..=28).contains(&phase));
}

#[tokio::test]
async fn test_sun_in_cancer() {
    let (_, json) = support::get_json(app(), FRIDA).await;
    assert_eq!(json["sun"]["sign"], "Can");
    assert_eq!(json["sun"]["element"], "Water");
}

#[tokio::test]
async fn test_default_name() {
    let uri = "/natal_chart?year=1907&month=7&day=6&hour=8&minute=30&city=Coyoacan";
    let (status, json) = support::get_json(app(), uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "New Chart");
}

#[tokio::test]
async fn test_houses_system_parameter() {
    let uri = format!("{}&houses_system=equal", FRIDA);
    let (status, json) = support::get_json(app(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["houses_system"], "Equal");
}

#[tokio::test]
async fn test_unresolvable_city() {
    let uri = "/natal_chart?year=1907&month=7&day=6&hour=8&minute=30&city=Atlantis";
    let (status, json) = support::get_json(app(), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Astrology calculation error"));
    assert!(error.contains("Atlantis"));
}

#[tokio::test]
async fn test_missing_and_malformed_parameters() {
    for uri in [
        "/natal_chart?month=7&day=6&hour=8&minute=30&city=Coyoacan",
        "/natal_chart?year=abc&month=7&day=6&hour=8&minute=30&city=Coyoacan",
        "/natal_chart?year=1907&month=7&day=6&hour=8&minute=30",
        "/natal_chart?year=1907&month=7&day=6&hour=8&minute=30&city=",
    ] {
        let (status, json) = support::get_json(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid input parameters"));
    }
}

#[tokio::test]
async fn test_gazetteer_backed_router() {
    let app = create_subject_router(Arc::new(Gazetteer::new()), ChartSettings::default());
    let uri = "/natal_chart?year=1990&month=5&day=17&hour=14&minute=30&city=new%20york";
    let (status, json) = support::get_json(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nation"], "US");
    assert_eq!(json["tz_str"], "America/New_York");
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let app = create_subject_router(Arc::new(PanickingGeocoder), ChartSettings::default());
    let (status, json) = support::get_json(app, FRIDA).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("An unexpected error occurred"));
    assert!(error.contains("geocoder exploded"));
}
