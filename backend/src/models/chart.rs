//! Chart payload types shared by both services.

use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::models::zodiac::{format_degree, get_sign, normalize_degrees, round4, Language};

/// Civil birth date and time as supplied by the caller, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthMoment {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
}

impl BirthMoment {
    /// Validate into a calendar date-time (no zone attached yet).
    pub fn to_naive(&self) -> ChartResult<NaiveDateTime> {
        let invalid_date = || ChartError::InvalidDate {
            year: self.year,
            month: self.month.max(0) as u32,
            day: self.day.max(0) as u32,
        };
        let month = u32::try_from(self.month).map_err(|_| invalid_date())?;
        let day = u32::try_from(self.day).map_err(|_| invalid_date())?;
        let date = NaiveDate::from_ymd_opt(self.year, month, day).ok_or_else(invalid_date)?;

        let invalid_time = || ChartError::InvalidTime {
            hour: self.hour.max(0) as u32,
            minute: self.minute.max(0) as u32,
        };
        let hour = u32::try_from(self.hour).map_err(|_| invalid_time())?;
        let minute = u32::try_from(self.minute).map_err(|_| invalid_time())?;
        date.and_hms_opt(hour, minute, 0).ok_or_else(invalid_time)
    }
}

/// A longitude rendered for display: sign, in-sign degree string, raw value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub name: String,
    pub sign: String,
    /// English label, present when `sign` is localized
    #[serde(rename = "signEn", default, skip_serializing_if = "Option::is_none")]
    pub sign_en: Option<String>,
    pub degree: String,
    /// Ecliptic longitude in `[0, 360)`, rounded to four decimals
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrograde: Option<bool>,
}

impl PlanetPosition {
    pub fn from_longitude(name: impl Into<String>, longitude: f64) -> Self {
        Self::localized(name, longitude, Language::English)
    }

    /// Position whose `sign` is in `language`; non-English labels also carry `signEn`.
    pub fn localized(name: impl Into<String>, longitude: f64, language: Language) -> Self {
        let longitude = normalize_degrees(longitude);
        let sign = get_sign(longitude);
        Self {
            name: name.into(),
            sign: sign.label(language).to_string(),
            sign_en: (language != Language::English).then(|| sign.name().to_string()),
            degree: format_degree(longitude),
            longitude: round4(longitude),
            house: None,
            retrograde: None,
        }
    }

    pub fn with_house(mut self, house: usize) -> Self {
        self.house = Some(house);
        self
    }

    pub fn with_retrograde(mut self, retrograde: bool) -> Self {
        self.retrograde = Some(retrograde);
        self
    }
}

/// String-keyed map that serializes in insertion order.
///
/// Chart consumers expect bodies in chart order (Sun first, Pluto last),
/// which a `BTreeMap` would sort away.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}
