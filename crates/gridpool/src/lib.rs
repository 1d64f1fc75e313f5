//! gridpool: fixed-length neighbourhood descriptors for multi-agent
//! trajectory forecasting.
//!
//! For each agent in a scene step, neighbours are binned into a square
//! grid centred on (or, in front mode, facing along) the agent, and a
//! per-neighbour feature (occupancy, relative velocity or hidden state)
//! is pooled into an `n x n x pooling_dim` descriptor.
//!
//! This is the facade crate re-exporting the public API of the
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use gridpool::prelude::*;
//!
//! let config = EngineConfig::builder()
//!     .cell_side(2.0)
//!     .n(4)
//!     .pool_size(1)
//!     .build()
//!     .unwrap();
//! let engine = BatchedEngine::new(config).unwrap();
//!
//! let now = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
//! let batch = engine.compute(&SceneStep::new(&now)).unwrap();
//!
//! let layout = DescriptorLayout::new(4, 1);
//! assert_eq!(batch.row(0).unwrap()[layout.index(0, 2, 2)], 1.0);
//! assert_eq!(batch.metrics().neighbors_binned, 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gridpool-core` | Points, variants, grid configuration, errors |
//! | [`space`] | `gridpool-space` | Ego frames, rotation, sub-grid indexing |
//! | [`obs`] | `gridpool-obs` | Scatter, blur, pooling, descriptor layout |
//! | [`engine`] | `gridpool-engine` | Batched and per-agent engines |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, configuration and errors (`gridpool-core`).
pub use gridpool_core as types;

/// Reference frames and sub-grid binning (`gridpool-space`).
///
/// [`space::EgoFrame`] produces ego-relative offsets; [`space::SubGrid`]
/// maps them to sub-cells.
pub use gridpool_space as space;

/// Scatter, blur and pooling stages (`gridpool-obs`).
pub use gridpool_obs as obs;

/// Descriptor engines (`gridpool-engine`).
///
/// [`engine::BatchedEngine`] for fully observed, world-aligned scenes;
/// [`engine::PerAgentEngine`] for front alignment and partial
/// observations.
pub use gridpool_engine as engine;

/// Common imports for typical gridpool usage.
///
/// ```rust
/// use gridpool::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use gridpool_core::{GridConfig, Point2, PoolKernel, SceneStep, Variant};

    // Errors
    pub use gridpool_core::{ConfigError, StepError};
    pub use gridpool_engine::EngineError;

    // Layout
    pub use gridpool_obs::DescriptorLayout;

    // Engine
    pub use gridpool_engine::{
        compute_descriptor, BatchedEngine, DescriptorBatch, Embed, EngineConfig, Execution,
        IdentityEmbed, PerAgentEngine, PoolingEngine, StepMetrics,
    };
}
