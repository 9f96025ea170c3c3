//! Zodiac signs and longitude formatting.
//!
//! Longitudes are tropical ecliptic degrees. Every helper here normalises its
//! input into `[0, 360)` first, so callers may pass raw or negative values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classical element of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// Modality (quality) of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Cardinal,
    Fixed,
    Mutable,
}

/// The twelve tropical signs, in ecliptic order starting at 0° Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Signs indexed by `floor(longitude / 30)`.
pub const SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    /// Zero-based position in [`SIGNS`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Sign at a (wrapping) index.
    pub fn from_index(index: usize) -> Self {
        SIGNS[index % 12]
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    /// Chinese label ("白羊座", "金牛座", ...).
    pub fn chinese_name(self) -> &'static str {
        match self {
            Sign::Aries => "白羊座",
            Sign::Taurus => "金牛座",
            Sign::Gemini => "双子座",
            Sign::Cancer => "巨蟹座",
            Sign::Leo => "狮子座",
            Sign::Virgo => "处女座",
            Sign::Libra => "天秤座",
            Sign::Scorpio => "天蝎座",
            Sign::Sagittarius => "射手座",
            Sign::Capricorn => "摩羯座",
            Sign::Aquarius => "水瓶座",
            Sign::Pisces => "双鱼座",
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        match language {
            Language::English => self.name(),
            Language::Chinese => self.chinese_name(),
        }
    }

    /// Three-letter abbreviation ("Ari", "Tau", ...).
    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    pub fn quality(self) -> Quality {
        match self.index() % 3 {
            0 => Quality::Cardinal,
            1 => Quality::Fixed,
            _ => Quality::Mutable,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Sign::Aries => "♈️",
            Sign::Taurus => "♉️",
            Sign::Gemini => "♊️",
            Sign::Cancer => "♋️",
            Sign::Leo => "♌️",
            Sign::Virgo => "♍️",
            Sign::Libra => "♎️",
            Sign::Scorpio => "♏️",
            Sign::Sagittarius => "♐️",
            Sign::Capricorn => "♑️",
            Sign::Aquarius => "♒️",
            Sign::Pisces => "♓️",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Language of sign labels in chart output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "zh" | "zh-cn" | "zh_cn" | "cn" | "chinese" => Ok(Language::Chinese),
            other => Err(format!("Unknown language '{}'. Use en or zh.", other)),
        }
    }
}

/// Wrap any finite angle into `[0, 360)`. Non-finite input maps to `0.0`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Index of the sign containing `longitude`.
pub fn sign_index(longitude: f64) -> usize {
    ((normalize_degrees(longitude) / 30.0).floor() as usize).min(11)
}

pub fn get_sign(longitude: f64) -> Sign {
    SIGNS[sign_index(longitude)]
}

/// Degrees past the start of the containing sign, in `[0, 30)`.
pub fn position_in_sign(longitude: f64) -> f64 {
    normalize_degrees(longitude) - (sign_index(longitude) as f64) * 30.0
}

/// Whole degrees and arc-minutes within the sign. Minutes are truncated.
pub fn degrees_minutes(longitude: f64) -> (u32, u32) {
    let within = position_in_sign(longitude);
    let degrees = within.floor();
    let minutes = ((within - degrees) * 60.0).floor();
    (degrees as u32, (minutes as u32).min(59))
}

/// Render the in-sign position as `D°MM'`, e.g. `12°05'`.
pub fn format_degree(longitude: f64) -> String {
    let (degrees, minutes) = degrees_minutes(longitude);
    format!("{}°{:02}'", degrees, minutes)
}

/// Round a longitude to four decimals for JSON output.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_boundaries() {
        assert_eq!(get_sign(0.0), Sign::Aries);
        assert_eq!(get_sign(29.9999), Sign::Aries);
        assert_eq!(get_sign(30.0), Sign::Taurus);
        assert_eq!(get_sign(359.999), Sign::Pisces);
    }

    #[test]
    fn test_format_degree_pads_minutes() {
        assert_eq!(format_degree(12.0 + 5.0 / 60.0 + 1e-9), "12°05'");
        assert_eq!(format_degree(45.5), "15°30'");
        assert_eq!(format_degree(0.0), "0°00'");
    }

    #[test]
    fn test_minutes_truncate() {
        // 10.999... degrees is still 10°59'
        assert_eq!(format_degree(10.9999), "10°59'");
    }

    #[test]
    fn test_negative_and_large_inputs_wrap() {
        assert_eq!(get_sign(-10.0), Sign::Pisces);
        assert_eq!(format_degree(-10.0), "20°00'");
        assert_eq!(get_sign(390.0), Sign::Taurus);
        assert_eq!(format_degree(720.25), "0°15'");
    }

    #[test]
    fn test_tiny_negative_does_not_overflow_index() {
        assert_eq!(sign_index(-1e-15), 0);
        assert_eq!(normalize_degrees(-1e-15), 0.0);
    }

    #[test]
    fn test_non_finite_maps_to_aries() {
        assert_eq!(get_sign(f64::NAN), Sign::Aries);
        assert_eq!(format_degree(f64::INFINITY), "0°00'");
    }

    #[test]
    fn test_formula_agreement_over_circle() {
        let mut lon: f64 = 0.0;
        while lon < 360.0 {
            let expected_index = (lon / 30.0).floor() as usize;
            let rem = lon % 30.0;
            let expected_minutes = ((rem - rem.floor()) * 60.0).floor() as u32;
            assert_eq!(sign_index(lon), expected_index);
            assert_eq!(degrees_minutes(lon), (rem.floor() as u32, expected_minutes));
            lon += 0.37;
        }
    }

    #[test]
    fn test_element_and_quality_cycle() {
        assert_eq!(Sign::Aries.element(), Element::Fire);
        assert_eq!(Sign::Taurus.element(), Element::Earth);
        assert_eq!(Sign::Gemini.element(), Element::Air);
        assert_eq!(Sign::Cancer.element(), Element::Water);
        assert_eq!(Sign::Leo.quality(), Quality::Fixed);
        assert_eq!(Sign::Pisces.quality(), Quality::Mutable);
        assert_eq!(Sign::Capricorn.quality(), Quality::Cardinal);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Sign::Aries.label(Language::Chinese), "白羊座");
        assert_eq!(Sign::Pisces.label(Language::Chinese), "双鱼座");
        assert_eq!(Sign::Libra.label(Language::English), "Libra");
        assert_eq!("ZH".parse::<Language>().unwrap(), Language::Chinese);
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(Sign::Sagittarius.abbreviation(), "Sag");
        assert_eq!(Sign::from_index(13), Sign::Taurus);
    }
}
