//! Astrological subject from birth data and a city name.
//!
//! The HTTP layer resolves the city with a [`crate::geocoding::Geocoder`]
//! first, then the chart is computed synchronously by [`compute_subject`]. The record layout is flat:
//! one object per planet (`sun` .. `pluto`) and per house (`first_house` ..
//! `twelfth_house`) next to the birth data echo.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info};

use crate::ephemeris::{utc_from_zone, BodyPosition, HouseCusps, HouseSystem, Observer, Planet};
use crate::error::ChartResult;
use crate::geocoding::GeoLocation;
use crate::models::chart::{BirthMoment, OrderedMap};
use crate::models::zodiac::{get_sign, normalize_degrees, position_in_sign, round4, Element, Quality};

pub const DEFAULT_SUBJECT_NAME: &str = "New Chart";

const HOUSE_NAMES: [&str; 12] = [
    "First_House",
    "Second_House",
    "Third_House",
    "Fourth_House",
    "Fifth_House",
    "Sixth_House",
    "Seventh_House",
    "Eighth_House",
    "Ninth_House",
    "Tenth_House",
    "Eleventh_House",
    "Twelfth_House",
];

const PHASE_NAMES: [(&str, &str); 8] = [
    ("New Moon", "🌑"),
    ("Waxing Crescent", "🌒"),
    ("First Quarter", "🌓"),
    ("Waxing Gibbous", "🌔"),
    ("Full Moon", "🌕"),
    ("Waning Gibbous", "🌖"),
    ("Last Quarter", "🌗"),
    ("Waning Crescent", "🌘"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRequest {
    pub name: String,
    pub moment: BirthMoment,
    pub city: String,
    /// ISO 3166-1 alpha-2 hint for the geocoder
    pub nation: Option<String>,
    pub house_system: HouseSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PointType {
    Planet,
    House,
}

/// One planet or house cusp in the subject record.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectPoint {
    pub name: String,
    pub quality: Quality,
    pub element: Element,
    /// Three-letter sign abbreviation
    pub sign: String,
    /// Zero-based sign index
    pub sign_num: usize,
    /// Degrees within the sign
    pub position: f64,
    /// Ecliptic longitude
    pub abs_pos: f64,
    pub emoji: String,
    pub point_type: PointType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrograde: Option<bool>,
}

impl SubjectPoint {
    fn new(name: impl Into<String>, longitude: f64, point_type: PointType) -> Self {
        let longitude = normalize_degrees(longitude);
        let sign = get_sign(longitude);
        Self {
            name: name.into(),
            quality: sign.quality(),
            element: sign.element(),
            sign: sign.abbreviation().to_string(),
            sign_num: sign.index(),
            position: round4(position_in_sign(longitude)),
            abs_pos: round4(longitude),
            emoji: sign.emoji().to_string(),
            point_type,
            house: None,
            retrograde: None,
        }
    }

    fn planet(body: &BodyPosition, cusps: &HouseCusps) -> Self {
        let mut point = Self::new(body.planet.name(), body.longitude, PointType::Planet);
        point.house = Some(HOUSE_NAMES[cusps.house_of(body.longitude) - 1].to_string());
        point.retrograde = Some(body.retrograde);
        point
    }
}

/// Sun/Moon elongation and the phase derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct LunarPhase {
    /// Moon minus Sun longitude, `[0, 360)`
    pub degrees_between_s_m: f64,
    /// Day of the 28-step lunar cycle, `1..=28`
    pub moon_phase: u8,
    pub moon_phase_name: String,
    pub moon_emoji: String,
}

impl LunarPhase {
    pub fn from_longitudes(sun: f64, moon: f64) -> Self {
        let elongation = normalize_degrees(moon - sun);
        let moon_phase = ((elongation / (360.0 / 28.0)).floor() as u8 + 1).min(28);
        let octant = (((elongation + 22.5) / 45.0).floor() as usize) % 8;
        let (name, emoji) = PHASE_NAMES[octant];
        Self {
            degrees_between_s_m: round4(elongation),
            moon_phase,
            moon_phase_name: name.to_string(),
            moon_emoji: emoji.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AstrologicalSubject {
    pub name: String,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub city: String,
    pub nation: String,
    pub lng: f64,
    pub lat: f64,
    pub tz_str: String,
    pub zodiac_type: &'static str,
    pub houses_system: String,
    /// Local clock time in decimal hours
    pub local_time: f64,
    /// UTC clock time in decimal hours
    pub utc_time: f64,
    pub iso_formatted_local_datetime: String,
    pub iso_formatted_utc_datetime: String,
    pub julian_day: f64,
    #[serde(flatten)]
    pub planets: OrderedMap<SubjectPoint>,
    #[serde(flatten)]
    pub houses: OrderedMap<SubjectPoint>,
    pub lunar_phase: LunarPhase,
}

/// Compute the subject for an already resolved place.
pub fn compute_subject(
    request: &SubjectRequest,
    location: &GeoLocation,
) -> ChartResult<AstrologicalSubject> {
    let local = request.moment.to_naive()?;
    let (instant, tz) = utc_from_zone(local, &location.timezone)?;
    let observer = Observer::new(location.latitude, location.longitude, instant)?;

    let bodies = observer.bodies();
    let cusps = observer.houses(request.house_system)?;

    let planets = bodies
        .iter()
        .map(|body| (body.planet.key(), SubjectPoint::planet(body, &cusps)))
        .collect();

    let houses = cusps
        .cusps
        .iter()
        .zip(HOUSE_NAMES)
        .map(|(&cusp, name)| {
            (
                name.to_lowercase(),
                SubjectPoint::new(name, cusp, PointType::House),
            )
        })
        .collect();

    let lunar_phase = LunarPhase::from_longitudes(
        longitude_of(&bodies, Planet::Sun),
        longitude_of(&bodies, Planet::Moon),
    );

    debug!(
        city = %location.name,
        timezone = %tz,
        utc = %instant,
        "Resolved subject birth instant"
    );
    info!(
        name = %request.name,
        system = %cusps.system,
        "Computed astrological subject"
    );

    Ok(AstrologicalSubject {
        name: request.name.clone(),
        year: request.moment.year,
        month: request.moment.month,
        day: request.moment.day,
        hour: request.moment.hour,
        minute: request.moment.minute,
        city: location.name.clone(),
        nation: location.country_code.clone(),
        lng: location.longitude,
        lat: location.latitude,
        tz_str: location.timezone.clone(),
        zodiac_type: "Tropic",
        houses_system: cusps.system.name().to_string(),
        local_time: decimal_hours(local),
        utc_time: decimal_hours(instant.naive_utc()),
        iso_formatted_local_datetime: local_iso(instant, tz),
        iso_formatted_utc_datetime: instant.to_rfc3339_opts(SecondsFormat::Secs, false),
        julian_day: observer.julian_day().value(),
        planets,
        houses,
        lunar_phase,
    })
}

fn longitude_of(bodies: &[BodyPosition], planet: Planet) -> f64 {
    bodies
        .iter()
        .find(|b| b.planet == planet)
        .map(|b| b.longitude)
        .unwrap_or_default()
}

fn decimal_hours(time: NaiveDateTime) -> f64 {
    round4(time.hour() as f64 + time.minute() as f64 / 60.0)
}

fn local_iso(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}
