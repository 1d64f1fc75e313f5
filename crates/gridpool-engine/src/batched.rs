//! Batched engine: every ordered pair at once.
//!
//! All `N * (N - 1)` pairwise offsets and features are built in one pass
//! and scattered into a single `N x planes` target, one disjoint slab per
//! ego. Each slab is then pooled into that ego's descriptor row.
//!
//! The batched path supports world-aligned grids only and requires every
//! agent (and, for the directional variant, every previous position) to
//! be observed. Use [`PerAgentEngine`](crate::PerAgentEngine) otherwise.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace, trace_span};

use gridpool_core::{ConfigError, Point2, SceneStep, StepError};
use gridpool_obs::{GridPooler, PoolScratch, ScatterTarget};
use gridpool_space::{pairwise_differences, SubGrid};

use crate::config::{EngineConfig, Execution};
use crate::dispatch::VariantDispatcher;
use crate::engine::PoolingEngine;
use crate::error::EngineError;
use crate::metrics::StepMetrics;

/// Sub-cell and feature of every ordered pair, ego-major.
struct PairTable {
    /// Neighbours per ego (`N - 1`).
    per_ego: usize,
    /// `None` when the pair falls outside the grid.
    cells: Vec<Option<usize>>,
    features: Vec<f32>,
}

/// Engine that bins all pairs of a step in one pass.
///
/// Within an ego's slab pairs are written in ascending neighbour order,
/// so a shared sub-cell keeps the higher-indexed neighbour, matching
/// [`PerAgentEngine`](crate::PerAgentEngine). Out-of-range pairs are
/// dropped, never clamped.
#[derive(Clone, Debug)]
pub struct BatchedEngine {
    config: EngineConfig,
    dispatcher: VariantDispatcher,
    grid: SubGrid,
    pooler: GridPooler,
}

impl BatchedEngine {
    /// Validate `config` and build the engine.
    ///
    /// Heading-aligned grids are rejected with
    /// [`ConfigError::UnsupportedByEngine`].
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        if config.grid.front {
            return Err(ConfigError::UnsupportedByEngine {
                engine: "batched",
                reason: "heading-aligned grids need per-agent rotation".to_string(),
            }
            .into());
        }
        let dispatcher = VariantDispatcher::new(config.variant, false);
        let grid = SubGrid::new(&config.grid);
        let pooler = GridPooler::new(&config.grid, dispatcher.pooling_dim());
        debug!(
            variant = %config.variant,
            n = config.grid.n,
            pool_size = config.grid.pool_size,
            blur_size = config.grid.blur_size,
            execution = ?config.execution,
            "batched engine ready"
        );
        Ok(Self {
            config,
            dispatcher,
            grid,
            pooler,
        })
    }

    /// Reject any unobserved input the batched path cannot mask.
    fn check_observed(&self, step: &SceneStep<'_>) -> Result<(), StepError> {
        if let Some(agent) = step.positions.iter().position(Point2::is_missing) {
            return Err(StepError::MissingObservation { agent });
        }
        if self.dispatcher.needs_previous() {
            let missing = (0..step.agent_count())
                .find(|&i| step.previous(i).is_none_or(|p| p.is_missing()));
            if let Some(agent) = missing {
                return Err(StepError::MissingObservation { agent });
            }
        }
        Ok(())
    }

    fn pair_table(&self, step: &SceneStep<'_>) -> PairTable {
        let mut offsets = Vec::new();
        pairwise_differences(step.positions, &mut offsets);
        let cells = offsets.iter().map(|&o| self.grid.cell_index(o)).collect();
        let mut features = Vec::new();
        self.dispatcher.pairwise_features_into(step, &mut features);
        PairTable {
            per_ego: step.agent_count().saturating_sub(1),
            cells,
            features,
        }
    }

    /// Scatter ego `ego`'s pairs into its slab and pool into `row`.
    fn describe(
        &self,
        table: &PairTable,
        ego: usize,
        planes: &mut [f32],
        occupied: &mut [bool],
        row: &mut [f32],
        scratch: &mut PoolScratch,
    ) -> Result<StepMetrics, StepError> {
        let dim = self.dispatcher.pooling_dim();
        let mut metrics = StepMetrics::default();
        let mut target = ScatterTarget::new(planes, occupied, self.grid.cell_count(), dim)?;

        let base = ego * table.per_ego;
        for pair in base..base + table.per_ego {
            metrics.pairs_considered += 1;
            match table.cells[pair] {
                Some(cell) => target.write(cell, &table.features[pair * dim..(pair + 1) * dim]),
                None => metrics.out_of_range += 1,
            }
        }
        let stats = target.stats();
        metrics.neighbors_binned = stats.writes;
        metrics.cell_overwrites = stats.overwrites;

        if stats.is_empty() {
            row.fill(0.0);
            metrics.degenerate_agents = 1;
            return Ok(metrics);
        }
        self.pooler.pool_into(target.planes(), scratch, row)?;
        Ok(metrics)
    }
}

impl PoolingEngine for BatchedEngine {
    fn name(&self) -> &'static str {
        "batched"
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn compute_into(
        &self,
        step: &SceneStep<'_>,
        output: &mut [f32],
    ) -> Result<StepMetrics, EngineError> {
        let start = Instant::now();
        step.validate(&self.config.variant, false)?;
        self.check_observed(step)?;

        let agents = step.agent_count();
        let len = self.descriptor_len();
        let required = agents * len;
        if output.len() < required {
            return Err(StepError::BufferTooSmall {
                buffer: "descriptor output",
                required,
                actual: output.len(),
            }
            .into());
        }
        let output = &mut output[..required];
        let _span = trace_span!("compute", engine = "batched", agents).entered();

        let mut metrics = if agents < 2 {
            trace!("fewer than two agents; zero descriptors");
            output.fill(0.0);
            StepMetrics {
                degenerate_agents: agents,
                ..StepMetrics::default()
            }
        } else {
            let table = self.pair_table(step);
            let cell_count = self.grid.cell_count();
            let slab = self.pooler.planes_len();
            let mut planes = vec![0.0f32; agents * slab];
            let mut occupied = vec![false; agents * cell_count];

            match self.config.execution {
                Execution::Sequential => {
                    let mut scratch = self.pooler.scratch();
                    let mut acc = StepMetrics::default();
                    let slabs = planes
                        .chunks_mut(slab)
                        .zip(occupied.chunks_mut(cell_count))
                        .zip(output.chunks_mut(len));
                    for (ego, ((p, o), row)) in slabs.enumerate() {
                        acc = acc.merge(self.describe(&table, ego, p, o, row, &mut scratch)?);
                    }
                    acc
                }
                Execution::Parallel => planes
                    .par_chunks_mut(slab)
                    .zip(occupied.par_chunks_mut(cell_count))
                    .zip(output.par_chunks_mut(len))
                    .enumerate()
                    .map_init(
                        || self.pooler.scratch(),
                        |scratch, (ego, ((p, o), row))| {
                            self.describe(&table, ego, p, o, row, scratch)
                        },
                    )
                    .try_reduce(StepMetrics::default, |a, b| Ok(a.merge(b)))?,
            }
        };

        metrics.agents = agents;
        metrics.total_us = start.elapsed().as_micros() as u64;
        trace!(
            pairs = metrics.pairs_considered,
            binned = metrics.neighbors_binned,
            out_of_range = metrics.out_of_range,
            "step pooled"
        );
        Ok(metrics)
    }
}
