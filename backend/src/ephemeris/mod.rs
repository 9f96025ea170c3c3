//! Ephemeris layer.
//!
//! Body positions, sidereal time and obliquity come from the `astro` crate
//! ([`bodies`], [`Observer`]); only the house division is computed here
//! ([`houses`]). The service layer never does trigonometry of its own.

pub mod bodies;
pub mod houses;
pub mod observer;

pub use bodies::{EclipticPoint, Planet, PLANETS};
pub use houses::{Angles, HouseCusps, HouseSystem};
pub use observer::{utc_from_offset, utc_from_zone, BodyPosition, Observer, SUPPORTED_YEARS};
