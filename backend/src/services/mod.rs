//! Service layer.
//!
//! Each service turns a parsed request into a serialisable chart by calling
//! the ephemeris layer. Nothing here knows about HTTP.

pub mod natal;
pub mod subject;

pub use natal::{natal_chart, natal_chart_at, NatalChart, NatalRequest};
pub use subject::{
    compute_subject, AstrologicalSubject, LunarPhase, SubjectRequest,
    DEFAULT_SUBJECT_NAME,
};
