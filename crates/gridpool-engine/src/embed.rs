//! Seam for the downstream descriptor projection.
//!
//! The learnable projection from a descriptor to an embedding lives
//! outside this crate. [`Embed`] is the shape it plugs into; only the
//! [`IdentityEmbed`] pass-through ships here.

use gridpool_core::StepError;

use crate::engine::DescriptorBatch;
use crate::error::EngineError;

/// Maps one descriptor of `input_dim` values to `output_dim` values.
pub trait Embed: Send + Sync {
    /// Expected descriptor length.
    fn input_dim(&self) -> usize;

    /// Length of the produced embedding.
    fn output_dim(&self) -> usize;

    /// Write the embedding of `descriptor` into `output`.
    ///
    /// Callers guarantee `descriptor.len() == input_dim()` and
    /// `output.len() == output_dim()`.
    fn embed(&self, descriptor: &[f32], output: &mut [f32]);
}

/// Pass-through embedding of a fixed width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentityEmbed {
    dim: usize,
}

impl IdentityEmbed {
    /// Identity over descriptors of length `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Embed for IdentityEmbed {
    fn input_dim(&self) -> usize {
        self.dim
    }

    fn output_dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, descriptor: &[f32], output: &mut [f32]) {
        output.copy_from_slice(descriptor);
    }
}

/// Embed every row of `batch`, returning `agents * output_dim` values.
pub fn embed_batch(embedder: &dyn Embed, batch: &DescriptorBatch) -> Result<Vec<f32>, EngineError> {
    if embedder.input_dim() != batch.descriptor_len() {
        return Err(StepError::ShapeMismatch {
            input: "descriptor",
            expected: embedder.input_dim(),
            actual: batch.descriptor_len(),
        }
        .into());
    }
    let out_dim = embedder.output_dim();
    let mut out = vec![0.0; batch.agents() * out_dim];
    if out_dim == 0 {
        return Ok(out);
    }
    for (row, dst) in batch.rows().zip(out.chunks_mut(out_dim)) {
        embedder.embed(row, dst);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, PerAgentEngine, PoolingEngine};
    use gridpool_core::{Point2, SceneStep};

    struct Total;

    impl Embed for Total {
        fn input_dim(&self) -> usize {
            16
        }
        fn output_dim(&self) -> usize {
            1
        }
        fn embed(&self, descriptor: &[f32], output: &mut [f32]) {
            output[0] = descriptor.iter().sum();
        }
    }

    fn batch() -> DescriptorBatch {
        let engine = PerAgentEngine::new(EngineConfig::default()).unwrap();
        let now = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 0.5),
        ];
        engine.compute(&SceneStep::new(&now)).unwrap()
    }

    #[test]
    fn identity_reproduces_descriptors() {
        let b = batch();
        let out = embed_batch(&IdentityEmbed::new(16), &b).unwrap();
        assert_eq!(out, b.as_slice());
    }

    #[test]
    fn custom_projection_runs_per_row() {
        let out = embed_batch(&Total, &batch()).unwrap();
        // Each ego sees the two others.
        assert_eq!(out, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let err = embed_batch(&IdentityEmbed::new(8), &batch()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Step(StepError::ShapeMismatch {
                input: "descriptor",
                expected: 8,
                actual: 16,
            })
        ));
    }
}
