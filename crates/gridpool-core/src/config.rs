//! Grid geometry configuration.
//!
//! [`GridConfig`] is immutable once an engine is built and is shared
//! read-only by every per-step call. [`validate()`](GridConfig::validate)
//! checks the structural invariants; engines call it at construction.

use crate::error::ConfigError;

/// Largest supported sub-grid side (`n * pool_size`).
///
/// Offsets are binned through `f32`, which represents every integer up
/// to 2^24 exactly.
pub const MAX_SUB_GRID_SIDE: usize = 1 << 24;

/// Reduction applied to each `pool_size x pool_size` block of sub-cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PoolKernel {
    /// Signed sum of the block (power pooling with p = 1). Reference
    /// reduction; embeddings trained against it expect exactly this.
    #[default]
    Sum,
    /// Sum of magnitudes. Equal to `Sum` for non-negative features.
    AbsSum,
    /// Sum divided by the block area.
    Mean,
    /// Largest value in the block.
    Max,
}

/// Geometry of the pooling grid centred on (or ahead of) the ego agent.
///
/// The coarse grid is `n x n` cells of `cell_side` scene units; each
/// coarse cell is split into `pool_size x pool_size` sub-cells, giving a
/// `(n * pool_size)^2` sub-grid that is scattered into and then pooled
/// back down to `n x n`.
///
/// # Examples
///
/// ```
/// use gridpool_core::{GridConfig, PoolKernel};
///
/// let grid = GridConfig {
///     cell_side: 2.0,
///     n: 4,
///     pool_size: 1,
///     ..GridConfig::default()
/// };
/// grid.validate().unwrap();
/// assert_eq!(grid.sub_grid_side(), 4);
/// assert_eq!(grid.descriptor_len(2), 32);
/// assert_eq!(grid.kernel, PoolKernel::Sum);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Scene-unit side length of one coarse cell. Default: 2.0.
    pub cell_side: f32,
    /// Coarse cells per axis. Default: 4.
    pub n: usize,
    /// Sub-cells per coarse cell per axis. Default: 8.
    pub pool_size: usize,
    /// Width of the box blur applied before pooling; 0 disables it. Default: 0.
    pub blur_size: usize,
    /// Align the grid with the ego's heading instead of the world axes.
    /// Default: false.
    pub front: bool,
    /// Block reduction. Default: [`PoolKernel::Sum`].
    pub kernel: PoolKernel,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_side: 2.0,
            n: 4,
            pool_size: 8,
            blur_size: 0,
            front: false,
            kernel: PoolKernel::Sum,
        }
    }
}

impl GridConfig {
    /// Check every structural invariant, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_side.is_finite() || self.cell_side <= 0.0 {
            return Err(ConfigError::InvalidCellSide {
                value: self.cell_side,
            });
        }
        if self.n == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        let too_large = ConfigError::GridTooLarge {
            n: self.n,
            pool_size: self.pool_size,
        };
        let side = self
            .n
            .checked_mul(self.pool_size)
            .ok_or_else(|| too_large.clone())?;
        if side > MAX_SUB_GRID_SIDE || side.checked_mul(side).is_none() {
            return Err(too_large);
        }
        Ok(())
    }

    /// Sub-cells per axis: `n * pool_size`.
    pub fn sub_grid_side(&self) -> usize {
        self.n * self.pool_size
    }

    /// Total sub-cells: `(n * pool_size)^2`.
    pub fn sub_cell_count(&self) -> usize {
        let side = self.sub_grid_side();
        side * side
    }

    /// Scene-unit side of one sub-cell: `cell_side / pool_size`.
    pub fn sub_cell_side(&self) -> f32 {
        self.cell_side / self.pool_size as f32
    }

    /// Descriptor length for `pooling_dim` feature channels:
    /// `n * n * pooling_dim`.
    pub fn descriptor_len(&self, pooling_dim: usize) -> usize {
        self.n * self.n * pooling_dim
    }
}
