//! Configuration for the casement window management engine.
//!
//! The config is a KDL document. Every node is optional:
//!
//! ```kdl
//! window-spacing 20
//! snapping {
//!     grid-size 20
//!     threshold 10
//! }
//! momentum {
//!     friction 0.95
//!     rest-velocity 0.1
//! }
//! placement {
//!     cascade-step 30
//!     cascade-limit 5
//! }
//! ```

use std::ffi::OsStr;
use std::path::Path;

use miette::{Context, IntoDiagnostic};
use tracing::debug;

pub mod momentum;
pub mod placement;
pub mod snapping;
pub mod utils;

pub use crate::momentum::Momentum;
pub use crate::placement::Placement;
pub use crate::snapping::Snapping;
pub use crate::utils::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Gap kept between windows, and between windows and the container edges.
    #[knuffel(child, unwrap(argument), default = FloatOrInt(20.))]
    pub window_spacing: FloatOrInt<0, 65535>,
    #[knuffel(child, default)]
    pub snapping: Snapping,
    #[knuffel(child, default)]
    pub momentum: Momentum,
    #[knuffel(child, default)]
    pub placement: Placement,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_spacing: FloatOrInt(20.),
            snapping: Snapping::default(),
            momentum: Momentum::default(),
            placement: Placement::default(),
        }
    }
}

/// A config value that decodes fine but cannot drive the engine.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// Friction must be strictly between 0 and 1, otherwise momentum never settles.
    #[error("momentum friction must be between 0 and 1 (exclusive), got {0}")]
    #[diagnostic(code(casement::config::invalid), help("try a value like 0.95"))]
    FrictionOutOfRange(f64),
    /// Rest velocity must be positive, otherwise momentum never settles.
    #[error("momentum rest-velocity must be positive, got {0}")]
    #[diagnostic(code(casement::config::invalid), help("try a value like 0.1"))]
    NonPositiveRestVelocity(f64),
    #[error("snapping grid-size must be positive, got {0}")]
    #[diagnostic(code(casement::config::invalid), help("try a value like 20"))]
    NonPositiveGridSize(f64),
    #[error("snapping threshold must not be negative, got {0}")]
    #[diagnostic(code(casement::config::invalid), help("a threshold of 0 never snaps"))]
    NegativeSnapThreshold(f64),
    /// The cascade offset wraps modulo the limit, which can't be zero.
    #[error("placement cascade-limit must be at least 1")]
    #[diagnostic(
        code(casement::config::invalid),
        help("use 1 to stack every new window at the same spot")
    )]
    ZeroCascadeLimit,
}

impl Config {
    /// Reads, parses and validates the config file at `path`.
    pub fn load(path: &Path) -> miette::Result<Self> {
        let _span = tracy_client::span!("Config::load");

        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let filename = path
            .file_name()
            .and_then(OsStr::to_str)
            .unwrap_or("config.kdl");
        let config = Self::parse(filename, &contents).context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    /// Parses and validates a config from text.
    pub fn parse(filename: &str, text: &str) -> miette::Result<Self> {
        let _span = tracy_client::span!("Config::parse");

        let config = knuffel::parse::<Self>(filename, text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that decode fine but would break the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let friction = self.momentum.friction.0;
        if !(friction > 0. && friction < 1.) {
            return Err(ConfigError::FrictionOutOfRange(friction));
        }

        let rest_velocity = self.momentum.rest_velocity.0;
        if !(rest_velocity > 0.) {
            return Err(ConfigError::NonPositiveRestVelocity(rest_velocity));
        }

        let grid_size = self.snapping.grid_size.0;
        if !(grid_size > 0.) {
            return Err(ConfigError::NonPositiveGridSize(grid_size));
        }

        let threshold = self.snapping.threshold.0;
        if !(threshold >= 0.) {
            return Err(ConfigError::NegativeSnapThreshold(threshold));
        }

        if self.placement.cascade_limit == 0 {
            return Err(ConfigError::ZeroCascadeLimit);
        }

        Ok(())
    }
}
