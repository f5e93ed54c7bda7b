//! Error types for simulation construction and configuration.

use thiserror::Error;

/// Errors raised while building or configuring a simulation.
///
/// Stepping never fails: degenerate runtime states (coincident centers, an
/// empty node set, ticking while stopped) are handled locally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A polygon ring is malformed.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A force name was not found in the registry.
    #[error("unknown force: {0}")]
    UnknownForce(String),
}

/// Result alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
