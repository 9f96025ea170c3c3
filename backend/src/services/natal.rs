//! Natal chart from explicit coordinates and a fixed UTC offset.
//!
//! Longitude arrives west-positive and the offset in hours east of UTC.
//! The chart carries the ten bodies with house and retrograde flags, the
//! two angles, and the twelve cusps of the requested house system.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::ephemeris::{utc_from_offset, HouseCusps, HouseSystem, Observer};
use crate::error::ChartResult;
use crate::models::chart::{BirthMoment, OrderedMap, PlanetPosition};
use crate::models::zodiac::{format_degree, get_sign, round4, Language};

/// Parameters of one natal chart request, already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct NatalRequest {
    pub moment: BirthMoment,
    /// Degrees, west positive (74.0 is 74° W)
    pub longitude_west: f64,
    pub latitude: f64,
    /// Hours east of UTC
    pub tz_offset: f64,
    pub house_system: HouseSystem,
    pub include_transits: bool,
    /// Language of the `sign` labels
    pub language: Language,
}

/// Echo of the request plus what was derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct ChartInfo {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub lon: f64,
    pub lat: f64,
    pub tz: f64,
    pub utc: String,
    pub julian_day: f64,
    pub house_system: String,
    pub zodiac: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartAngles {
    #[serde(rename = "ASC")]
    pub ascendant: PlanetPosition,
    #[serde(rename = "MC")]
    pub midheaven: PlanetPosition,
}

#[derive(Debug, Clone, Serialize)]
pub struct HouseEntry {
    pub house: usize,
    pub sign: String,
    #[serde(rename = "signEn", skip_serializing_if = "Option::is_none")]
    pub sign_en: Option<String>,
    pub degree: String,
    pub cusp: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NatalChart {
    pub info: ChartInfo,
    pub planets: OrderedMap<PlanetPosition>,
    pub angles: ChartAngles,
    pub houses: Vec<HouseEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transits: Option<Box<NatalChart>>,
}

/// Compute the chart, taking transits (if asked for) at the current instant.
pub fn natal_chart(request: &NatalRequest) -> ChartResult<NatalChart> {
    natal_chart_at(request, Utc::now())
}

/// Compute the chart with an explicit instant for the transit overlay.
pub fn natal_chart_at(request: &NatalRequest, now: DateTime<Utc>) -> ChartResult<NatalChart> {
    let local = request.moment.to_naive()?;
    let instant = utc_from_offset(local, request.tz_offset)?;
    let observer = Observer::new(request.latitude, -request.longitude_west, instant)?;

    let mut chart = build_chart(&observer, local, request)?;

    if request.include_transits {
        let observer = Observer::new(request.latitude, -request.longitude_west, now)?;
        let transit_request = NatalRequest {
            moment: moment_of(now.naive_utc()),
            tz_offset: 0.0,
            include_transits: false,
            ..request.clone()
        };
        let transits = build_chart(&observer, now.naive_utc(), &transit_request)?;
        chart.transits = Some(Box::new(transits));
    }

    Ok(chart)
}

fn moment_of(naive: NaiveDateTime) -> BirthMoment {
    use chrono::{Datelike, Timelike};
    BirthMoment {
        year: naive.year(),
        month: naive.month() as i32,
        day: naive.day() as i32,
        hour: naive.hour() as i32,
        minute: naive.minute() as i32,
    }
}

fn build_chart(
    observer: &Observer,
    local: NaiveDateTime,
    request: &NatalRequest,
) -> ChartResult<NatalChart> {
    let angles = observer.angles()?;
    let cusps = observer.houses(request.house_system)?;

    let planets = observer
        .bodies()
        .into_iter()
        .map(|body| {
            let name = body.planet.name();
            let position = PlanetPosition::localized(name, body.longitude, request.language)
                .with_house(cusps.house_of(body.longitude))
                .with_retrograde(body.retrograde);
            (name.to_string(), position)
        })
        .collect();

    debug!(
        local = %local,
        utc = %observer.instant,
        system = %cusps.system,
        "Computed natal chart"
    );

    Ok(NatalChart {
        info: ChartInfo {
            year: request.moment.year,
            month: request.moment.month,
            day: request.moment.day,
            hour: request.moment.hour,
            minute: request.moment.minute,
            lon: request.longitude_west,
            lat: request.latitude,
            tz: request.tz_offset,
            utc: observer.instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            julian_day: observer.julian_day().value(),
            house_system: cusps.system.name().to_string(),
            zodiac: "Tropical",
        },
        planets,
        angles: ChartAngles {
            ascendant: PlanetPosition::localized("ASC", angles.ascendant, request.language),
            midheaven: PlanetPosition::localized("MC", angles.midheaven, request.language),
        },
        houses: house_entries(&cusps, request.language),
        transits: None,
    })
}

fn house_entries(cusps: &HouseCusps, language: Language) -> Vec<HouseEntry> {
    cusps
        .cusps
        .iter()
        .enumerate()
        .map(|(i, &cusp)| HouseEntry {
            house: i + 1,
            sign: get_sign(cusp).label(language).to_string(),
            sign_en: (language != Language::English).then(|| get_sign(cusp).name().to_string()),
            degree: format_degree(cusp),
            cusp: round4(cusp),
        })
        .collect()
}
