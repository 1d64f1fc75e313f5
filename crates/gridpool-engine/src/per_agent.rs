//! Per-agent engine: one ego at a time.
//!
//! Supports heading-aligned grids and partial observations. Each ego is
//! processed independently with worker-local scratch, so agents can be
//! spread over rayon without changing results.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace, trace_span};

use gridpool_core::{Point2, SceneStep, StepError};
use gridpool_obs::{GridAggregator, GridPooler, PoolScratch};
use gridpool_space::SubGrid;

use crate::config::{EngineConfig, Execution};
use crate::dispatch::VariantDispatcher;
use crate::engine::PoolingEngine;
use crate::error::EngineError;
use crate::metrics::StepMetrics;

/// Worker-local buffers reused across the egos one worker handles.
struct AgentScratch {
    neighbors: Vec<usize>,
    offsets: Vec<Point2>,
    velocities: Vec<Point2>,
    features: Vec<f32>,
    aggregator: GridAggregator,
    pool: PoolScratch,
}

/// Engine that builds each ego's grid on its own.
///
/// Neighbours are visited in ascending index order, so when two land in
/// the same sub-cell the higher index wins. Unobserved neighbours are
/// skipped; an unobserved ego, or one whose required previous position
/// is unobserved, gets an all-zero descriptor.
#[derive(Clone, Debug)]
pub struct PerAgentEngine {
    config: EngineConfig,
    dispatcher: VariantDispatcher,
    grid: SubGrid,
    pooler: GridPooler,
}

impl PerAgentEngine {
    /// Validate `config` and build the engine.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let dispatcher = VariantDispatcher::new(config.variant, config.grid.front);
        let grid = SubGrid::new(&config.grid);
        let pooler = GridPooler::new(&config.grid, dispatcher.pooling_dim());
        debug!(
            variant = %config.variant,
            n = config.grid.n,
            pool_size = config.grid.pool_size,
            blur_size = config.grid.blur_size,
            front = config.grid.front,
            execution = ?config.execution,
            "per-agent engine ready"
        );
        Ok(Self {
            config,
            dispatcher,
            grid,
            pooler,
        })
    }

    fn scratch(&self) -> AgentScratch {
        AgentScratch {
            neighbors: Vec::new(),
            offsets: Vec::new(),
            velocities: Vec::new(),
            features: Vec::new(),
            aggregator: GridAggregator::new(self.grid.cell_count(), self.dispatcher.pooling_dim()),
            pool: self.pooler.scratch(),
        }
    }

    /// Fill `out` with the descriptor of `ego`.
    fn describe(
        &self,
        step: &SceneStep<'_>,
        ego: usize,
        scratch: &mut AgentScratch,
        out: &mut [f32],
    ) -> Result<StepMetrics, StepError> {
        out.fill(0.0);
        let mut metrics = StepMetrics::default();

        let Some(frame) = self.dispatcher.ego_frame(step, ego) else {
            trace!(ego, "no usable frame; zero descriptor");
            metrics.degenerate_agents = 1;
            return Ok(metrics);
        };

        scratch.neighbors.clear();
        for j in (0..step.agent_count()).filter(|&j| j != ego) {
            metrics.pairs_considered += 1;
            if self.dispatcher.neighbor_observed(step, j) {
                scratch.neighbors.push(j);
            } else {
                metrics.masked += 1;
            }
        }

        frame.offsets_into(
            scratch.neighbors.iter().map(|&j| step.positions[j]),
            &mut scratch.offsets,
        );
        self.dispatcher.features_into(
            step,
            &frame,
            &scratch.neighbors,
            &mut scratch.velocities,
            &mut scratch.features,
        );

        let dim = self.dispatcher.pooling_dim();
        let mut target = scratch.aggregator.target();
        for (k, &offset) in scratch.offsets.iter().enumerate() {
            match self.grid.cell_index(offset) {
                Some(cell) => target.write(cell, &scratch.features[k * dim..(k + 1) * dim]),
                None => metrics.out_of_range += 1,
            }
        }
        let stats = target.stats();
        metrics.neighbors_binned = stats.writes;
        metrics.cell_overwrites = stats.overwrites;

        if stats.is_empty() {
            metrics.degenerate_agents = 1;
            return Ok(metrics);
        }
        self.pooler
            .pool_into(scratch.aggregator.planes(), &mut scratch.pool, out)?;
        Ok(metrics)
    }
}

impl PoolingEngine for PerAgentEngine {
    fn name(&self) -> &'static str {
        "per_agent"
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
        step.validate(&self.config.variant, self.config.grid.front)?;

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
        let _span = trace_span!("compute", engine = "per_agent", agents).entered();

        let mut metrics = match agents {
            0 => StepMetrics::default(),
            1 => {
                trace!("single agent; zero descriptor");
                output.fill(0.0);
                StepMetrics {
                    degenerate_agents: 1,
                    ..StepMetrics::default()
                }
            }
            _ => match self.config.execution {
                Execution::Sequential => {
                    let mut scratch = self.scratch();
                    let mut acc = StepMetrics::default();
                    for (ego, row) in output.chunks_mut(len).enumerate() {
                        acc = acc.merge(self.describe(step, ego, &mut scratch, row)?);
                    }
                    acc
                }
                Execution::Parallel => output
                    .par_chunks_mut(len)
                    .enumerate()
                    .map_init(
                        || self.scratch(),
                        |scratch, (ego, row)| self.describe(step, ego, scratch, row),
                    )
                    .try_reduce(StepMetrics::default, |a, b| Ok(a.merge(b)))?,
            },
        };

        metrics.agents = agents;
        metrics.total_us = start.elapsed().as_micros() as u64;
        trace!(
            binned = metrics.neighbors_binned,
            out_of_range = metrics.out_of_range,
            masked = metrics.masked,
            degenerate = metrics.degenerate_agents,
            "step pooled"
        );
        Ok(metrics)
    }
}
