//! HTTP server module.
//!
//! Axum routers for the two chart services. The layer stack is the same for
//! both:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query parsing and validation                           │
//! │  - JSON serialization, error tiers                        │
//! │  - CORS, compression, tracing, panic capture              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services::natal / services::subject)      │
//! │  - Geocoding (subject service only)                       │
//! │  - Chart assembly                                         │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Ephemeris Layer                                          │
//! │  - Body positions, sidereal time, angles, houses          │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::AppError;
pub use router::{create_natal_router, create_router, create_subject_router};
pub use server::{init_tracing, serve};
pub use state::{AppState, ServiceKind};
