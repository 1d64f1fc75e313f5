//! Error types for gridpool.
//!
//! Two families: [`ConfigError`] is raised once, when an engine is
//! constructed, and [`StepError`] is raised per call when the caller's
//! step inputs are inconsistent. Degenerate geometry (a lone agent, all
//! neighbours out of range or missing) is never an error; it yields an
//! all-zero descriptor.

use std::error::Error;
use std::fmt;

/// Invalid engine or grid configuration. Fatal at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `cell_side` is zero, negative, NaN or infinite.
    InvalidCellSide {
        /// The rejected value.
        value: f32,
    },
    /// The coarse grid size `n` is zero.
    ZeroGridSize,
    /// `pool_size` is zero.
    ZeroPoolSize,
    /// The social variant was configured with `hidden_dim == 0`.
    MissingHiddenWidth,
    /// `n * pool_size` (or the resulting cell count) overflows.
    GridTooLarge {
        /// Requested coarse grid size.
        n: usize,
        /// Requested sub-cells per coarse cell.
        pool_size: usize,
    },
    /// The chosen engine cannot honour part of the configuration.
    UnsupportedByEngine {
        /// Engine name.
        engine: &'static str,
        /// What it cannot do.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSide { value } => {
                write!(f, "cell_side must be finite and positive, got {value}")
            }
            Self::ZeroGridSize => write!(f, "grid size n must be at least 1"),
            Self::ZeroPoolSize => write!(f, "pool_size must be at least 1"),
            Self::MissingHiddenWidth => {
                write!(f, "social variant requires a non-zero hidden_dim")
            }
            Self::GridTooLarge { n, pool_size } => {
                write!(f, "sub-grid of {n}x{pool_size} cells per axis is too large")
            }
            Self::UnsupportedByEngine { engine, reason } => {
                write!(f, "{engine} does not support {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Inconsistent per-step inputs. Surfaced to the caller, never retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// An input's length disagrees with the agent count.
    ShapeMismatch {
        /// Which input (`"prev_positions"`, `"hidden_states"`, ...).
        input: &'static str,
        /// Required element count.
        expected: usize,
        /// Supplied element count.
        actual: usize,
    },
    /// An input required by the configured variant was not supplied.
    MissingInput {
        /// Which input is missing.
        input: &'static str,
    },
    /// The batched engine was given an unobserved (NaN) agent.
    MissingObservation {
        /// Index of the first unobserved agent.
        agent: usize,
    },
    /// A caller-provided buffer cannot hold the result.
    BufferTooSmall {
        /// Which buffer.
        buffer: &'static str,
        /// Required element count.
        required: usize,
        /// Supplied element count.
        actual: usize,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                input,
                expected,
                actual,
            } => write!(f, "{input}: expected {expected} elements, got {actual}"),
            Self::MissingInput { input } => {
                write!(f, "{input} is required by the configured variant")
            }
            Self::MissingObservation { agent } => {
                write!(f, "agent {agent} is unobserved; batched pooling needs full observations")
            }
            Self::BufferTooSmall {
                buffer,
                required,
                actual,
            } => write!(f, "{buffer} buffer too small: {actual} < {required}"),
        }
    }
}

impl Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages() {
        let e = ConfigError::InvalidCellSide { value: -1.0 };
        assert!(e.to_string().contains("-1"));
        let e = ConfigError::UnsupportedByEngine {
            engine: "BatchedEngine",
            reason: "front alignment".into(),
        };
        assert_eq!(e.to_string(), "BatchedEngine does not support front alignment");
    }

    #[test]
    fn step_error_messages() {
        let e = StepError::ShapeMismatch {
            input: "prev_positions",
            expected: 3,
            actual: 2,
        };
        assert_eq!(e.to_string(), "prev_positions: expected 3 elements, got 2");
        let e = StepError::BufferTooSmall {
            buffer: "output",
            required: 32,
            actual: 16,
        };
        assert!(e.to_string().contains("16 < 32"));
    }
}
