mod config;
mod error;

pub use config::{APP_NAME, CONFIG_NAME, TrackerConfigExt};
pub use error::{ConfigError, CurveError};
pub use xpbar_types::{DisplayMode, TrackerConfig};
