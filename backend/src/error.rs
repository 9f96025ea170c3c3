//! Error type for chart computation.
//!
//! Every variant here describes a request that cannot be charted (bad calendar
//! date, unknown place, impossible local time). The HTTP layer reports all of
//! them as client errors.

use thiserror::Error;

use crate::geocoding::GeocodeError;

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid date: {year:04}-{month:02}-{day:02} does not exist")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid time: {hour:02}:{minute:02} is not a time of day")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("Date {0} is outside the supported range (years 1885 to 2099)")]
    DateOutOfRange(String),

    #[error("Local time {local} does not exist in time zone {timezone}")]
    NonexistentLocalTime { local: String, timezone: String },

    #[error("Latitude {0} is out of range (-90, 90)")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Time zone offset {0} hours is out of range [-14, 14]")]
    TimezoneOffsetOutOfRange(f64),

    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),

    #[error("Unknown house system '{0}'. Use placidus, porphyry, equal or whole_sign.")]
    UnknownHouseSystem(String),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message() {
        let err = ChartError::InvalidDate {
            year: 2023,
            month: 2,
            day: 30,
        };
        assert_eq!(err.to_string(), "Invalid date: 2023-02-30 does not exist");
    }

    #[test]
    fn test_geocode_error_is_transparent() {
        let err: ChartError = GeocodeError::NotFound("Atlantis".to_string()).into();
        assert!(err.to_string().contains("Atlantis"));
    }
}
