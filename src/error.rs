//! Error types for the simulation.
//!
//! The numeric core never fails. Errors only come from setting a simulation
//! up: loading configuration and attaching bodies to their container.

use std::fmt;

/// Errors that can occur while building a [`Simulation`](crate::Simulation).
#[derive(Debug)]
pub enum SimulationError {
    /// The container refused to mount a visual node, so the body cannot be displayed.
    MissingContainer,
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// Configuration text could not be parsed.
    Parse(serde_json::Error),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::MissingContainer => {
                write!(f, "No container to mount body nodes into")
            }
            SimulationError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SimulationError::Parse(e) => write!(f, "Failed to parse configuration: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Parse(e)
    }
}
