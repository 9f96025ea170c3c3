use astro::time::{self, CalType, Date};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::*;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00:00 TT).
pub const J2000: f64 = 2_451_545.0;

/// Julian Day number.
/// JD 0 = -4712-01-01 12:00:00 (proleptic Julian calendar)
///
/// The same newtype carries both time scales: [`JulianDay::from_datetime`]
/// gives Universal Time (for sidereal time), [`JulianDay::ephemeris`] gives
/// Terrestrial Time (for body positions).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDay(f64);

impl JulianDay {
    /// Create a new JD value.
    pub fn new(v: f64) -> Self {
        Self(v)
    }

    /// Raw JD value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Shift by a (possibly fractional) number of days.
    pub fn add_days(&self, days: f64) -> Self {
        Self(self.0 + days)
    }

    /// Julian Day (UT) of a UTC instant, Gregorian calendar.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let seconds = dt.num_seconds_from_midnight() as f64 + dt.nanosecond() as f64 / 1e9;
        let date = Date {
            year: dt.year() as i16,
            month: dt.month() as u8,
            decimal_day: dt.day() as f64 + seconds / 86_400.0,
            cal_type: CalType::Gregorian,
        };
        Self(time::julian_day(&date))
    }

    /// Ephemeris Julian Day (TT) of a UTC instant: UT plus ΔT.
    pub fn ephemeris(dt: DateTime<Utc>) -> Self {
        let delta_t = time::delta_t(dt.year(), dt.month() as u8);
        Self::from_datetime(dt).add_days(delta_t / 86_400.0)
    }
}

impl From<DateTime<Utc>> for JulianDay {
    fn from(dt: DateTime<Utc>) -> Self {
        JulianDay::from_datetime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::{JulianDay, J2000};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_jd_from_j2000_datetime() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let jd = JulianDay::from_datetime(dt);
        assert!((jd.value() - J2000).abs() < 1e-9);
    }

    #[test]
    fn test_jd_known_date() {
        // 1987-04-10 19:21:00 UT is JD 2446896.30625
        let dt = Utc.with_ymd_and_hms(1987, 4, 10, 19, 21, 0).unwrap();
        let jd = JulianDay::from(dt);
        assert!((jd.value() - 2_446_896.30625).abs() < 1e-6);
    }

    #[test]
    fn test_ephemeris_time_runs_ahead_of_ut() {
        // ΔT was close to a minute around 1990 and a few seconds around 1900
        let dt = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        let delta = (JulianDay::ephemeris(dt).value() - JulianDay::from(dt).value()) * 86_400.0;
        assert!(delta > 50.0 && delta < 65.0, "ΔT = {delta}");

        let dt = Utc.with_ymd_and_hms(1907, 7, 6, 14, 22, 0).unwrap();
        let delta = (JulianDay::ephemeris(dt).value() - JulianDay::from(dt).value()) * 86_400.0;
        assert!(delta.abs() < 15.0, "ΔT = {delta}");
    }

    #[test]
    fn test_jd_ordering() {
        let a = JulianDay::new(2_450_000.0);
        let b = a.add_days(0.5);
        assert!(a < b);
    }
}
