//! Turning binned neighbours into a fixed-length grid descriptor.
//!
//! The pipeline for one ego agent is
//!
//! 1. [`scatter`]: write each in-range neighbour's feature into its
//!    sub-cell (last write wins) on per-channel planes;
//! 2. [`blur`]: optional stride-1 box average over each plane;
//! 3. [`pool`]: reduce `pool_size x pool_size` blocks down to `n x n`;
//! 4. [`layout`]: the flattened, channel-major descriptor layout.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod blur;
pub mod layout;
pub mod pool;
pub mod scatter;

pub use layout::DescriptorLayout;
pub use pool::{GridPooler, PoolScratch};
pub use scatter::{GridAggregator, ScatterStats, ScatterTarget};
