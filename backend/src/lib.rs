//! # Astro Chart Backend
//!
//! Natal chart computation served over HTTP.
//!
//! Two services are built from this crate:
//!
//! - **subject** (`subject-server`): birth data plus a city name. The city is
//!   geocoded to coordinates and an IANA time zone, and a full astrological
//!   subject is returned (planets, house cusps, lunar phase).
//! - **natal** (`natal-server`): birth data plus explicit longitude (west
//!   positive), latitude and UTC offset. Returns planets with sign, degree,
//!   house and retrograde flag, the ASC/MC angles, and twelve house cusps.
//!
//! ## Architecture
//!
//! - [`models`]: zodiac signs, degree formatting, Julian days, chart payloads
//! - [`ephemeris`]: adapter over the `astro` crate, plus angles and house systems
//! - [`geocoding`]: city resolution (offline gazetteer, OpenCage)
//! - [`services`]: chart assembly for each service
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum routers, handlers and error mapping

pub mod config;
pub mod ephemeris;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ChartError, ChartResult};
