pub mod chart;
pub mod time;
pub mod zodiac;

pub use chart::*;
pub use time::*;
pub use zodiac::*;
