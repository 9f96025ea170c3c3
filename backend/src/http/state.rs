//! Application state for the HTTP server.

use std::fmt;
use std::sync::Arc;

use crate::config::ChartSettings;
use crate::geocoding::Geocoder;

/// Which of the two chart services a router serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// City-based astrological subject
    Subject,
    /// Coordinate-based natal chart
    Natal,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Subject => "subject",
            ServiceKind::Natal => "natal",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ServiceKind,
    /// City resolver; only the subject service has one
    pub geocoder: Option<Arc<dyn Geocoder>>,
    /// Default house systems
    pub chart: ChartSettings,
}

impl AppState {
    pub fn new(
        service: ServiceKind,
        geocoder: Option<Arc<dyn Geocoder>>,
        chart: ChartSettings,
    ) -> Self {
        Self {
            service,
            geocoder,
            chart,
        }
    }

    pub fn subject(geocoder: Arc<dyn Geocoder>, chart: ChartSettings) -> Self {
        Self::new(ServiceKind::Subject, Some(geocoder), chart)
    }

    pub fn natal(chart: ChartSettings) -> Self {
        Self::new(ServiceKind::Natal, None, chart)
    }
}
