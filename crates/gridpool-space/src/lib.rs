//! Spatial side of gridpool: reference frames and sub-grid binning.
//!
//! [`transform`] turns world positions into ego-relative offsets and
//! relative velocities, optionally rotated into the ego's heading frame.
//! [`geometry`] bins those offsets into the `(n * pool_size)^2` sub-grid
//! and flags range violations. The indexer never sees orientation: all
//! rotation happens before binning.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod transform;

pub use geometry::{GridOrigin, SubGrid};
pub use transform::{pairwise_differences, velocity, EgoFrame, Rotation2};
