//! Data Transfer Objects for the HTTP API.
//!
//! Chart requests arrive as flat query strings. Parameters are read from a
//! string map and checked by hand so that every failure names the offending
//! parameter in the 400 body.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::AppError;
use crate::ephemeris::HouseSystem;
use crate::models::chart::BirthMoment;
use crate::models::zodiac::Language;
use crate::services::{NatalRequest, SubjectRequest, DEFAULT_SUBJECT_NAME};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Borrowed view over the raw query parameters.
#[derive(Debug, Clone, Copy)]
pub struct QueryParams<'a> {
    params: &'a HashMap<String, String>,
}

impl<'a> QueryParams<'a> {
    pub fn new(params: &'a HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Trimmed, non-empty value for `key`.
    pub fn optional_str(&self, key: &str) -> Option<&'a str> {
        self.params
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required_str(&self, key: &str) -> Result<&'a str, AppError> {
        self.optional_str(key)
            .ok_or_else(|| AppError::InvalidInput(format!("missing parameter '{}'", key)))
    }

    pub fn required_int(&self, key: &str) -> Result<i32, AppError> {
        let raw = self.required_str(key)?;
        raw.parse().map_err(|_| {
            AppError::InvalidInput(format!("parameter '{}' must be an integer, got '{}'", key, raw))
        })
    }

    pub fn required_float(&self, key: &str) -> Result<f64, AppError> {
        let raw = self.required_str(key)?;
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(AppError::InvalidInput(format!(
                "parameter '{}' must be a finite number, got '{}'",
                key, raw
            ))),
        }
    }

    pub fn optional_bool(&self, key: &str) -> Result<bool, AppError> {
        match self.optional_str(key).map(str::to_lowercase).as_deref() {
            None | Some("false") | Some("0") | Some("no") => Ok(false),
            Some("true") | Some("1") | Some("yes") => Ok(true),
            Some(other) => Err(AppError::InvalidInput(format!(
                "parameter '{}' must be true or false, got '{}'",
                key, other
            ))),
        }
    }

    /// First present key among `keys`, parsed as a house system.
    pub fn house_system(&self, keys: &[&str], default: HouseSystem) -> Result<HouseSystem, AppError> {
        match keys.iter().find_map(|k| self.optional_str(k)) {
            Some(raw) => raw
                .parse()
                .map_err(|e: crate::error::ChartError| AppError::InvalidInput(e.to_string())),
            None => Ok(default),
        }
    }

    /// Label language from `lang`; English when absent.
    pub fn language(&self) -> Result<Language, AppError> {
        match self.optional_str("lang") {
            Some(raw) => raw.parse().map_err(AppError::InvalidInput),
            None => Ok(Language::default()),
        }
    }

    pub fn birth_moment(&self) -> Result<BirthMoment, AppError> {
        Ok(BirthMoment {
            year: self.required_int("year")?,
            month: self.required_int("month")?,
            day: self.required_int("day")?,
            hour: self.required_int("hour")?,
            minute: self.required_int("minute")?,
        })
    }

    /// `GET /natal_chart` on the natal service.
    pub fn natal_request(&self, default_system: HouseSystem) -> Result<NatalRequest, AppError> {
        Ok(NatalRequest {
            moment: self.birth_moment()?,
            longitude_west: self.required_float("lon")?,
            latitude: self.required_float("lat")?,
            tz_offset: self.required_float("tz")?,
            house_system: self.house_system(&["house_system", "houses_system"], default_system)?,
            include_transits: self.optional_bool("transits")?,
            language: self.language()?,
        })
    }

    /// `GET /natal_chart` on the subject service.
    pub fn subject_request(&self, default_system: HouseSystem) -> Result<SubjectRequest, AppError> {
        let moment = self.birth_moment()?;
        Ok(SubjectRequest {
            name: self
                .optional_str("name")
                .unwrap_or(DEFAULT_SUBJECT_NAME)
                .to_string(),
            moment,
            city: self.required_str("city")?.to_string(),
            nation: self
                .optional_str("nation")
                .or_else(|| self.optional_str("country"))
                .map(str::to_string),
            house_system: self.house_system(&["houses_system", "house_system"], default_system)?,
        })
    }
}
