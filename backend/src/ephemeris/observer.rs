//! Observer context: civil time to UTC, and per-observer chart queries.
//!
//! [`Observer`] is the adapter between a chart request and `astro`: bodies,
//! sidereal time and obliquity come from the library unchanged.

use astro::{ecliptic, time};
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::ops::RangeInclusive;

use super::bodies::Planet;
use super::houses::{self, Angles, HouseCusps, HouseSystem};
use crate::error::{ChartError, ChartResult};
use crate::models::time::JulianDay;
use crate::models::zodiac::normalize_degrees;

/// Largest offset in use anywhere (Line Islands, UTC+14).
const MAX_OFFSET_HOURS: f64 = 14.0;

/// Years covered by every theory in use; Pluto's is the narrowest.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1885..=2099;

/// Half-width of the central difference for longitude speed, in days.
const SPEED_STEP_DAYS: f64 = 0.5;

/// Convert local civil time at a fixed offset (hours east of UTC) to UTC.
pub fn utc_from_offset(local: NaiveDateTime, offset_hours: f64) -> ChartResult<DateTime<Utc>> {
    if !offset_hours.is_finite() || offset_hours.abs() > MAX_OFFSET_HOURS {
        return Err(ChartError::TimezoneOffsetOutOfRange(offset_hours));
    }
    let offset = Duration::seconds((offset_hours * 3600.0).round() as i64);
    let utc = local
        .checked_sub_signed(offset)
        .ok_or_else(|| ChartError::DateOutOfRange(local.to_string()))?;
    Ok(Utc.from_utc_datetime(&utc))
}

/// Convert local civil time in an IANA zone to UTC, honouring historical DST.
///
/// An ambiguous wall time (clocks going back) resolves to the earlier
/// instant. A skipped wall time (clocks going forward) is an error.
pub fn utc_from_zone(local: NaiveDateTime, timezone: &str) -> ChartResult<(DateTime<Utc>, Tz)> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| ChartError::UnknownTimezone(timezone.to_string()))?;
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            return Err(ChartError::NonexistentLocalTime {
                local: local.format("%Y-%m-%d %H:%M").to_string(),
                timezone: timezone.to_string(),
            })
        }
    };
    Ok((resolved.with_timezone(&Utc), tz))
}

/// Where one body sits at the observer's instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub planet: Planet,
    /// Geocentric ecliptic longitude, `[0, 360)`
    pub longitude: f64,
    /// Geocentric ecliptic latitude
    pub latitude: f64,
    /// Longitude speed, degrees per day
    pub speed: f64,
    pub retrograde: bool,
}

/// An observer on the Earth's surface at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Geographic latitude, north positive
    pub latitude: f64,
    /// Geographic longitude, east positive
    pub east_longitude: f64,
    pub instant: DateTime<Utc>,
}

impl Observer {
    pub fn new(latitude: f64, east_longitude: f64, instant: DateTime<Utc>) -> ChartResult<Self> {
        if !latitude.is_finite() || latitude.abs() >= 90.0 {
            return Err(ChartError::LatitudeOutOfRange(latitude));
        }
        if !east_longitude.is_finite() || east_longitude.abs() > 180.0 {
            return Err(ChartError::LongitudeOutOfRange(east_longitude));
        }
        if !SUPPORTED_YEARS.contains(&instant.year()) {
            return Err(ChartError::DateOutOfRange(
                instant.format("%Y-%m-%d %H:%M UTC").to_string(),
            ));
        }
        Ok(Self {
            latitude,
            east_longitude,
            instant,
        })
    }

    /// Julian Day in Universal Time.
    pub fn julian_day(&self) -> JulianDay {
        JulianDay::from_datetime(self.instant)
    }

    /// Julian Day in Terrestrial Time, the argument of the body theories.
    pub fn ephemeris_day(&self) -> JulianDay {
        JulianDay::ephemeris(self.instant)
    }

    /// Local mean sidereal time in degrees (RAMC).
    pub fn sidereal_time(&self) -> f64 {
        let greenwich = time::mn_sidr(self.julian_day().value()).to_degrees();
        normalize_degrees(greenwich + self.east_longitude)
    }

    /// Mean obliquity of the ecliptic in degrees.
    pub fn obliquity(&self) -> f64 {
        ecliptic::mn_oblq_IAU(self.ephemeris_day().value()).to_degrees()
    }

    pub fn body(&self, planet: Planet) -> BodyPosition {
        let jde = self.ephemeris_day();
        let position = planet.position(jde);
        let ahead = planet.position(jde.add_days(SPEED_STEP_DAYS)).longitude;
        let behind = planet.position(jde.add_days(-SPEED_STEP_DAYS)).longitude;
        let speed = (normalize_degrees(ahead - behind + 180.0) - 180.0) / (2.0 * SPEED_STEP_DAYS);
        BodyPosition {
            planet,
            longitude: position.longitude,
            latitude: position.latitude,
            speed,
            retrograde: planet.can_retrograde() && speed < 0.0,
        }
    }

    /// All ten bodies in chart order.
    pub fn bodies(&self) -> Vec<BodyPosition> {
        Planet::all().map(|p| self.body(p)).collect()
    }

    pub fn angles(&self) -> ChartResult<Angles> {
        houses::angles(self.sidereal_time(), self.latitude, self.obliquity())
    }

    pub fn houses(&self, system: HouseSystem) -> ChartResult<HouseCusps> {
        houses::house_cusps(system, self.sidereal_time(), self.latitude, self.obliquity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_fixed_offset_subtracts_from_local() {
        let utc = utc_from_offset(naive(2000, 1, 1, 20, 0), 8.0).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_fractional_and_negative_offsets() {
        let utc = utc_from_offset(naive(2000, 1, 1, 0, 0), 5.5).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(1999, 12, 31, 18, 30, 0).unwrap());
        let utc = utc_from_offset(naive(2000, 1, 1, 20, 0), -5.0).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2000, 1, 2, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(matches!(
            utc_from_offset(naive(2000, 1, 1, 0, 0), 15.0),
            Err(ChartError::TimezoneOffsetOutOfRange(_))
        ));
        assert!(utc_from_offset(naive(2000, 1, 1, 0, 0), f64::NAN).is_err());
    }

    #[test]
    fn test_zone_applies_summer_time() {
        let (utc, tz) = utc_from_zone(naive(2021, 7, 1, 12, 0), "Europe/Rome").unwrap();
        assert_eq!(tz, chrono_tz::Europe::Rome);
        assert_eq!(utc, Utc.with_ymd_and_hms(2021, 7, 1, 10, 0, 0).unwrap());
        let (utc, _) = utc_from_zone(naive(2021, 1, 1, 12, 0), "Europe/Rome").unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2021, 1, 1, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_zone_gap_is_an_error() {
        // clocks jumped from 02:00 to 03:00 on 2021-03-28 in Rome
        assert!(matches!(
            utc_from_zone(naive(2021, 3, 28, 2, 30), "Europe/Rome"),
            Err(ChartError::NonexistentLocalTime { .. })
        ));
    }

    #[test]
    fn test_zone_overlap_takes_earlier_instant() {
        // 02:30 happened twice on 2021-10-31 in Rome; first at UTC+2
        let (utc, _) = utc_from_zone(naive(2021, 10, 31, 2, 30), "Europe/Rome").unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2021, 10, 31, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_unknown_zone() {
        assert!(matches!(
            utc_from_zone(naive(2021, 1, 1, 0, 0), "Mars/Olympus_Mons"),
            Err(ChartError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_observer_validates_coordinates() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!(Observer::new(95.0, 0.0, t).is_err());
        assert!(Observer::new(0.0, 200.0, t).is_err());
        assert!(Observer::new(45.0, -74.0, t).is_ok());
    }

    #[test]
    fn test_observer_bodies_and_angles() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let observer = Observer::new(51.5, 0.0, t).unwrap();
        let bodies = observer.bodies();
        assert_eq!(bodies.len(), 10);
        assert!(!bodies[0].retrograde);
        assert!(!bodies[1].retrograde);
        let angles = observer.angles().unwrap();
        let houses = observer.houses(HouseSystem::Placidus).unwrap();
        assert_eq!(houses.cusps[0], angles.ascendant);
        assert_eq!(houses.cusps[9], angles.midheaven);
    }

    #[test]
    fn test_supported_years() {
        let early = Utc.with_ymd_and_hms(1884, 12, 31, 23, 0, 0).unwrap();
        assert!(matches!(
            Observer::new(0.0, 0.0, early),
            Err(ChartError::DateOutOfRange(_))
        ));
        let late = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();
        assert!(Observer::new(0.0, 0.0, late).is_err());
        let first = Utc.with_ymd_and_hms(1885, 1, 1, 0, 0, 0).unwrap();
        assert!(Observer::new(0.0, 0.0, first).is_ok());
        let last = Utc.with_ymd_and_hms(2099, 12, 31, 23, 59, 0).unwrap();
        assert!(Observer::new(0.0, 0.0, last).is_ok());
    }

    #[test]
    fn test_greenwich_sidereal_time_meeus_example() {
        // Astronomical Algorithms, example 12.a: 1987-04-10 0h UT, 13h10m46.3668s
        let t = Utc.with_ymd_and_hms(1987, 4, 10, 0, 0, 0).unwrap();
        let lst = Observer::new(0.0, 0.0, t).unwrap().sidereal_time();
        assert!((lst - 197.693_195).abs() < 1e-4, "{lst}");
    }

    #[test]
    fn test_obliquity_near_j2000() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let eps = Observer::new(0.0, 0.0, t).unwrap().obliquity();
        assert!((eps - 23.4393).abs() < 1e-3, "{eps}");
    }

    #[test]
    fn test_sidereal_time_shifts_with_longitude() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let greenwich = Observer::new(0.0, 0.0, t).unwrap().sidereal_time();
        let east = Observer::new(0.0, 15.0, t).unwrap().sidereal_time();
        let diff = (east - greenwich).rem_euclid(360.0);
        assert!((diff - 15.0).abs() < 1e-9);
    }
}
