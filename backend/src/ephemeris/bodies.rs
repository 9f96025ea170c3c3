//! The ten chart bodies and how each one is looked up in `astro`.

use astro::planet::{self, Planet as Vsop};
use astro::{lunar, pluto, precess, sun};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::time::{JulianDay, J2000};
use crate::models::zodiac::normalize_degrees;

/// A body placed in the chart, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Name-to-body table, in chart order.
pub const PLANETS: [(&str, Planet); 10] = [
    ("Sun", Planet::Sun),
    ("Moon", Planet::Moon),
    ("Mercury", Planet::Mercury),
    ("Venus", Planet::Venus),
    ("Mars", Planet::Mars),
    ("Jupiter", Planet::Jupiter),
    ("Saturn", Planet::Saturn),
    ("Uranus", Planet::Uranus),
    ("Neptune", Planet::Neptune),
    ("Pluto", Planet::Pluto),
];

/// Geocentric ecliptic coordinates of date, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl EclipticPoint {
    fn from_radians(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: normalize_degrees(longitude.to_degrees()),
            latitude: latitude.to_degrees(),
        }
    }
}

impl Planet {
    pub fn all() -> impl Iterator<Item = Planet> {
        PLANETS.iter().map(|(_, p)| *p)
    }

    pub fn name(self) -> &'static str {
        PLANETS[self as usize].0
    }

    /// Lowercase key used in the subject payload (`sun`, `moon`, ...).
    pub fn key(self) -> String {
        self.name().to_lowercase()
    }

    /// The luminaries never station, so they are never flagged retrograde.
    pub fn can_retrograde(self) -> bool {
        !matches!(self, Planet::Sun | Planet::Moon)
    }

    /// VSOP87 body, for the eight planets the theory covers.
    fn vsop(self) -> Option<Vsop> {
        match self {
            Planet::Mercury => Some(Vsop::Mercury),
            Planet::Venus => Some(Vsop::Venus),
            Planet::Mars => Some(Vsop::Mars),
            Planet::Jupiter => Some(Vsop::Jupiter),
            Planet::Saturn => Some(Vsop::Saturn),
            Planet::Uranus => Some(Vsop::Uranus),
            Planet::Neptune => Some(Vsop::Neptune),
            Planet::Sun | Planet::Moon | Planet::Pluto => None,
        }
    }

    /// Geocentric position at an ephemeris (TT) Julian Day.
    pub fn position(self, jde: JulianDay) -> EclipticPoint {
        let jde = jde.value();
        let (point, _) = match (self, self.vsop()) {
            (_, Some(body)) => planet::geocent_apprnt_ecl_coords(&body, jde),
            (Planet::Sun, None) => sun::geocent_ecl_pos(jde),
            (Planet::Moon, None) => lunar::geocent_ecl_pos(jde),
            _ => return pluto_position(jde),
        };
        EclipticPoint::from_radians(point.long, point.lat)
    }
}

/// `astro` gives Pluto heliocentric and referred to J2000; bring it to the
/// equinox of date and shift the origin to the Earth.
fn pluto_position(jde: f64) -> EclipticPoint {
    let (l, b, r) = pluto::heliocent_pos(jde);
    let (l, b) = precess::precess_ecl_coords(l, b, J2000, jde);
    let (l0, b0, r0) = planet::heliocent_coords(&Vsop::Earth, jde);

    let x = r * b.cos() * l.cos() - r0 * b0.cos() * l0.cos();
    let y = r * b.cos() * l.sin() - r0 * b0.cos() * l0.sin();
    let z = r * b.sin() - r0 * b0.sin();
    EclipticPoint::from_radians(y.atan2(x), z.atan2(x.hypot(y)))
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_in_chart_order() {
        for (index, (name, planet)) in PLANETS.iter().enumerate() {
            assert_eq!(*planet as usize, index);
            assert_eq!(planet.name(), *name);
        }
    }

    #[test]
    fn test_all_yields_ten_bodies() {
        assert_eq!(Planet::all().count(), 10);
        assert_eq!(Planet::Sun.key(), "sun");
    }

    #[test]
    fn test_only_planets_map_to_vsop() {
        let mapped: Vec<Planet> = Planet::all().filter(|p| p.vsop().is_some()).collect();
        assert_eq!(mapped.len(), 7);
        assert!(!mapped.contains(&Planet::Pluto));
    }

    #[test]
    fn test_every_body_lands_in_range() {
        let jde = JulianDay::new(J2000);
        for planet in Planet::all() {
            let point = planet.position(jde);
            assert!((0.0..360.0).contains(&point.longitude), "{planet}");
            assert!(point.latitude.abs() < 20.0, "{planet}");
        }
    }
}
