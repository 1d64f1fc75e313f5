//! Core types for the gridpool social-pooling workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate: agent positions, the
//! per-step scene view, grid configuration, neighbour-feature variants,
//! and the error types raised at construction and call time.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod point;
pub mod step;
pub mod variant;

pub use config::{GridConfig, PoolKernel};
pub use error::{ConfigError, StepError};
pub use point::Point2;
pub use step::SceneStep;
pub use variant::Variant;
