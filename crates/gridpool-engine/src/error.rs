//! Engine error type.

use std::error::Error;
use std::fmt;

use gridpool_core::{ConfigError, StepError};

/// Error from engine construction or a `compute` call.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// The configuration was rejected at construction.
    Config(ConfigError),
    /// The step inputs were inconsistent.
    Step(StepError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Step(e) => write!(f, "step: {e}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for EngineError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}
