//! Grid-descriptor engines.
//!
//! Two implementations of one [`PoolingEngine`] contract:
//!
//! - [`BatchedEngine`]: all ordered agent pairs at once into a single
//!   `N x (n * pool_size)^2 x pooling_dim` scatter target. World-aligned
//!   grids and fully observed steps only.
//! - [`PerAgentEngine`]: one ego at a time; supports heading-aligned
//!   (front) grids and masks unobserved neighbours.
//!
//! Both share the indexer ([`gridpool_space::SubGrid`]), the scatter and
//! pooling stages ([`gridpool_obs`]) and the [`VariantDispatcher`], and
//! agree exactly wherever both apply.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batched;
pub mod config;
pub mod dispatch;
pub mod embed;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod per_agent;

pub use batched::BatchedEngine;
pub use config::{EngineConfig, EngineConfigBuilder, Execution};
pub use dispatch::VariantDispatcher;
pub use embed::{embed_batch, Embed, IdentityEmbed};
pub use engine::{compute_descriptor, DescriptorBatch, PoolingEngine};
pub use error::EngineError;
pub use metrics::StepMetrics;
pub use per_agent::PerAgentEngine;
