//! Chart angles and house division.
//!
//! `astro` has no house systems, so the division itself lives here. Inputs are
//! the RAMC and obliquity that [`super::Observer`] takes from the library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::ChartError;
use crate::models::zodiac::{normalize_degrees, sign_index};

/// Ecliptic longitude culminating at the given RAMC.
pub fn midheaven(ramc: f64, obliquity: f64) -> f64 {
    let (theta, eps) = (ramc.to_radians(), obliquity.to_radians());
    normalize_degrees(theta.sin().atan2(theta.cos() * eps.cos()).to_degrees())
}

/// Ecliptic longitude rising on the eastern horizon.
pub fn ascendant(ramc: f64, latitude: f64, obliquity: f64) -> f64 {
    let (theta, eps, phi) = (
        ramc.to_radians(),
        obliquity.to_radians(),
        latitude.to_radians(),
    );
    let y = theta.cos();
    let x = -(theta.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Ecliptic longitude whose right ascension is `ra`.
fn ecliptic_from_ra(ra: f64, obliquity: f64) -> f64 {
    let (ra, eps) = (ra.to_radians(), obliquity.to_radians());
    normalize_degrees(ra.sin().atan2(ra.cos() * eps.cos()).to_degrees())
}

/// Supported house systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    Placidus,
    Porphyry,
    Equal,
    WholeSign,
}

impl HouseSystem {
    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "Placidus",
            HouseSystem::Porphyry => "Porphyry",
            HouseSystem::Equal => "Equal",
            HouseSystem::WholeSign => "Whole Sign",
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseSystem {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "placidus" | "p" => Ok(HouseSystem::Placidus),
            "porphyry" | "o" => Ok(HouseSystem::Porphyry),
            "equal" | "e" | "a" => Ok(HouseSystem::Equal),
            "whole_sign" | "wholesign" | "w" => Ok(HouseSystem::WholeSign),
            _ => Err(ChartError::UnknownHouseSystem(s.to_string())),
        }
    }
}

/// The ascendant and midheaven of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angles {
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Twelve cusp longitudes; index 0 is the first house.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseCusps {
    /// The system actually used (after any fallback)
    pub system: HouseSystem,
    pub cusps: [f64; 12],
}

impl HouseCusps {
    /// House (1..=12) containing `longitude`.
    pub fn house_of(&self, longitude: f64) -> usize {
        let lon = normalize_degrees(longitude);
        for i in 0..12 {
            let start = self.cusps[i];
            let span = normalize_degrees(self.cusps[(i + 1) % 12] - start);
            if normalize_degrees(lon - start) < span {
                return i + 1;
            }
        }
        1
    }
}

/// Compute angles for an observer.
pub fn angles(ramc: f64, latitude: f64, obliquity: f64) -> Result<Angles, ChartError> {
    check_latitude(latitude)?;
    Ok(Angles {
        ascendant: ascendant(ramc, latitude, obliquity),
        midheaven: midheaven(ramc, obliquity),
    })
}

fn check_latitude(latitude: f64) -> Result<(), ChartError> {
    if !latitude.is_finite() || latitude.abs() >= 90.0 {
        return Err(ChartError::LatitudeOutOfRange(latitude));
    }
    Ok(())
}

/// Compute house cusps. Placidus degrades to Porphyry where some cusp
/// never rises (inside the polar circles).
pub fn house_cusps(
    system: HouseSystem,
    ramc: f64,
    latitude: f64,
    obliquity: f64,
) -> Result<HouseCusps, ChartError> {
    let angles = angles(ramc, latitude, obliquity)?;
    let cusps = match system {
        HouseSystem::WholeSign => {
            let first = (sign_index(angles.ascendant) * 30) as f64;
            std::array::from_fn(|i| normalize_degrees(first + 30.0 * i as f64))
        }
        HouseSystem::Equal => {
            std::array::from_fn(|i| normalize_degrees(angles.ascendant + 30.0 * i as f64))
        }
        HouseSystem::Porphyry => porphyry(&angles),
        HouseSystem::Placidus => match placidus(&angles, ramc, latitude, obliquity) {
            Some(cusps) => cusps,
            None => {
                warn!(
                    latitude,
                    "Placidus houses undefined at this latitude, falling back to Porphyry"
                );
                return Ok(HouseCusps {
                    system: HouseSystem::Porphyry,
                    cusps: porphyry(&angles),
                });
            }
        },
    };
    Ok(HouseCusps { system, cusps })
}

/// Fill houses 4..=9 from their opposites.
fn with_opposites(mut cusps: [f64; 12]) -> [f64; 12] {
    for i in 3..9 {
        cusps[i] = normalize_degrees(cusps[(i + 6) % 12] + 180.0);
    }
    cusps
}

fn porphyry(angles: &Angles) -> [f64; 12] {
    let (asc, mc) = (angles.ascendant, angles.midheaven);
    let upper = normalize_degrees(asc - mc);
    let lower = normalize_degrees(mc + 180.0 - asc);
    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[1] = normalize_degrees(asc + lower / 3.0);
    cusps[2] = normalize_degrees(asc + 2.0 * lower / 3.0);
    cusps[9] = mc;
    cusps[10] = normalize_degrees(mc + upper / 3.0);
    cusps[11] = normalize_degrees(mc + 2.0 * upper / 3.0);
    with_opposites(cusps)
}

fn placidus(angles: &Angles, ramc: f64, latitude: f64, obliquity: f64) -> Option<[f64; 12]> {
    let mut cusps = [0.0; 12];
    cusps[0] = angles.ascendant;
    cusps[9] = angles.midheaven;
    // (index, RA offset of the starting guess, semi-arc fraction, above horizon)
    let intermediate = [
        (10, 30.0, 1.0 / 3.0, true),
        (11, 60.0, 2.0 / 3.0, true),
        (1, 120.0, 2.0 / 3.0, false),
        (2, 150.0, 1.0 / 3.0, false),
    ];
    for (index, offset, fraction, above) in intermediate {
        cusps[index] = placidus_cusp(ramc, latitude, obliquity, offset, fraction, above)?;
    }
    Some(with_opposites(cusps))
}

/// Iterate the semi-arc condition for one intermediate cusp.
fn placidus_cusp(
    ramc: f64,
    latitude: f64,
    obliquity: f64,
    offset: f64,
    fraction: f64,
    above: bool,
) -> Option<f64> {
    let tan_phi = latitude.to_radians().tan();
    let sin_eps = obliquity.to_radians().sin();
    let mut lon = ecliptic_from_ra(ramc + offset, obliquity);
    for _ in 0..100 {
        let declination = (sin_eps * lon.to_radians().sin()).asin();
        let x = tan_phi * declination.tan();
        if x.abs() > 1.0 {
            return None;
        }
        let ascensional_difference = x.asin().to_degrees();
        let ra = if above {
            ramc + fraction * (90.0 + ascensional_difference)
        } else {
            ramc + 180.0 - fraction * (90.0 - ascensional_difference)
        };
        let next = ecliptic_from_ra(ra, obliquity);
        let delta = normalize_degrees(next - lon + 180.0) - 180.0;
        lon = next;
        if delta.abs() < 1e-9 {
            return Some(lon);
        }
    }
    Some(lon)
}
