//! Engine configuration and builder.
//!
//! [`EngineConfig`] bundles the grid geometry, the neighbour-feature
//! variant and the execution mode. It is fixed when an engine is built;
//! [`validate()`](EngineConfig::validate) runs at construction.

use gridpool_core::{ConfigError, GridConfig, PoolKernel, Variant};

/// How an engine schedules per-agent work within one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// One agent after another on the calling thread.
    #[default]
    Sequential,
    /// Agents spread over the rayon thread pool. Each worker writes a
    /// disjoint descriptor row; results are identical to `Sequential`.
    Parallel,
}

/// Complete configuration for a [`PoolingEngine`](crate::PoolingEngine).
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Grid geometry.
    pub grid: GridConfig,
    /// Neighbour feature. Default: [`Variant::Occupancy`].
    pub variant: Variant,
    /// Scheduling. Default: [`Execution::Sequential`].
    pub execution: Execution,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            variant: Variant::Occupancy,
            execution: Execution::Sequential,
        }
    }
}

impl EngineConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder {
            config: EngineConfig::default(),
        }
    }

    /// Check all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        if let Variant::Social { hidden_dim: 0 } = self.variant {
            return Err(ConfigError::MissingHiddenWidth);
        }
        Ok(())
    }

    /// Feature channels per neighbour.
    pub fn pooling_dim(&self) -> usize {
        self.variant.pooling_dim()
    }

    /// Length of one agent's descriptor: `n * n * pooling_dim`.
    pub fn descriptor_len(&self) -> usize {
        self.grid.descriptor_len(self.pooling_dim())
    }
}

/// Builder for [`EngineConfig`].
///
/// # Examples
///
/// ```
/// use gridpool_engine::{EngineConfig, Execution};
///
/// let config = EngineConfig::builder()
///     .cell_side(1.0)
///     .n(6)
///     .pool_size(4)
///     .social(32)
///     .front(true)
///     .execution(Execution::Parallel)
///     .build()
///     .unwrap();
/// assert_eq!(config.descriptor_len(), 6 * 6 * 32);
/// ```
#[derive(Clone, Debug)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Coarse cell side in scene units (default 2.0).
    pub fn cell_side(mut self, cell_side: f32) -> Self {
        self.config.grid.cell_side = cell_side;
        self
    }

    /// Coarse cells per axis (default 4).
    pub fn n(mut self, n: usize) -> Self {
        self.config.grid.n = n;
        self
    }

    /// Sub-cells per coarse cell per axis (default 8).
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.config.grid.pool_size = pool_size;
        self
    }

    /// Box-blur width, 0 to disable (default 0).
    pub fn blur_size(mut self, blur_size: usize) -> Self {
        self.config.grid.blur_size = blur_size;
        self
    }

    /// Align the grid with the ego's heading (default false).
    pub fn front(mut self, front: bool) -> Self {
        self.config.grid.front = front;
        self
    }

    /// Block reduction (default [`PoolKernel::Sum`]).
    pub fn kernel(mut self, kernel: PoolKernel) -> Self {
        self.config.grid.kernel = kernel;
        self
    }

    /// Replace the whole grid geometry.
    pub fn grid(mut self, grid: GridConfig) -> Self {
        self.config.grid = grid;
        self
    }

    /// Neighbour feature variant.
    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Shorthand for [`Variant::Occupancy`].
    pub fn occupancy(self) -> Self {
        self.variant(Variant::Occupancy)
    }

    /// Shorthand for [`Variant::Directional`].
    pub fn directional(self) -> Self {
        self.variant(Variant::Directional)
    }

    /// Shorthand for [`Variant::Social`] with rows of `hidden_dim`.
    pub fn social(self, hidden_dim: usize) -> Self {
        self.variant(Variant::Social { hidden_dim })
    }

    /// Scheduling mode.
    pub fn execution(mut self, execution: Execution) -> Self {
        self.config.execution = execution;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
