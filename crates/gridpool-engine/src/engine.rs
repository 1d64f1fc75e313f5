//! The engine contract and its owned output.

use gridpool_core::{Point2, SceneStep};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::metrics::StepMetrics;

/// Computes one descriptor per agent for a scene step.
///
/// Engines are immutable after construction and `Send + Sync`: one
/// engine may serve many scenes and threads. Both implementations in this
/// crate produce identical descriptors wherever both accept the input.
pub trait PoolingEngine: Send + Sync {
    /// Short identifier used in logs and benchmarks.
    fn name(&self) -> &'static str;

    /// The validated configuration the engine was built with.
    fn config(&self) -> &EngineConfig;

    /// Length of one agent's descriptor.
    fn descriptor_len(&self) -> usize {
        self.config().descriptor_len()
    }

    /// Write `N` descriptors, agent-major, into `output`.
    ///
    /// `output` must hold at least `N * descriptor_len()` values; only
    /// that prefix is written.
    fn compute_into(
        &self,
        step: &SceneStep<'_>,
        output: &mut [f32],
    ) -> Result<StepMetrics, EngineError>;

    /// Allocate and return the descriptors for `step`.
    fn compute(&self, step: &SceneStep<'_>) -> Result<DescriptorBatch, EngineError> {
        let descriptor_len = self.descriptor_len();
        let agents = step.agent_count();
        let mut data = vec![0.0; agents * descriptor_len];
        let metrics = self.compute_into(step, &mut data)?;
        Ok(DescriptorBatch {
            data,
            agents,
            descriptor_len,
            metrics,
        })
    }
}

/// Compute descriptors from raw inputs.
///
/// `positions` holds current positions (NaN = unobserved). `prev` and
/// `hidden` are required only when the engine's configuration needs them.
pub fn compute_descriptor(
    engine: &dyn PoolingEngine,
    positions: &[Point2],
    prev: Option<&[Point2]>,
    hidden: Option<&[f32]>,
) -> Result<DescriptorBatch, EngineError> {
    let mut step = SceneStep::new(positions);
    if let Some(prev) = prev {
        step = step.with_previous(prev);
    }
    if let Some(hidden) = hidden {
        step = step.with_hidden(hidden);
    }
    engine.compute(&step)
}

/// Owned `N x descriptor_len` descriptor matrix plus its metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorBatch {
    data: Vec<f32>,
    agents: usize,
    descriptor_len: usize,
    metrics: StepMetrics,
}

impl DescriptorBatch {
    /// Number of agents (rows).
    pub fn agents(&self) -> usize {
        self.agents
    }

    /// Length of each row.
    pub fn descriptor_len(&self) -> usize {
        self.descriptor_len
    }

    /// Total number of values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the batch holds no agents.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Counters from the call that produced this batch.
    pub fn metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// Descriptor of `agent`, or `None` if out of range.
    pub fn row(&self, agent: usize) -> Option<&[f32]> {
        if agent >= self.agents {
            return None;
        }
        let start = agent * self.descriptor_len;
        self.data.get(start..start + self.descriptor_len)
    }

    /// Iterate over descriptors in agent order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(self.descriptor_len.max(1))
    }

    /// The flat agent-major data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Take the flat data.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
