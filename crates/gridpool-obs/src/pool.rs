//! Block pooling from the sub-grid down to the `n x n` descriptor.
//!
//! The `(n * pool_size)^2` sub-grid is partitioned into `n x n`
//! non-overlapping blocks of `pool_size x pool_size` sub-cells (kernel
//! and stride both `pool_size`), and each block is reduced per channel
//! by the configured [`PoolKernel`]. The reference reduction is
//! [`PoolKernel::Sum`], i.e. power pooling with p = 1.

use gridpool_core::{GridConfig, PoolKernel, StepError};

use crate::blur::{blurred_side, box_blur_into};

/// Reduce `channels` square planes of `in_side x in_side` into
/// `channels * n * n` pooled values, channel-major.
///
/// Only the leading `n * pool_size` rows and columns are read; a wider
/// input (even-width blur) has its trailing remainder ignored.
pub fn pool_blocks_into(
    input: &[f32],
    channels: usize,
    in_side: usize,
    pool_size: usize,
    n: usize,
    kernel: PoolKernel,
    output: &mut [f32],
) -> Result<(), StepError> {
    let plane = in_side * in_side;
    if in_side < n * pool_size {
        return Err(StepError::BufferTooSmall {
            buffer: "pool input side",
            required: n * pool_size,
            actual: in_side,
        });
    }
    if input.len() < channels * plane {
        return Err(StepError::BufferTooSmall {
            buffer: "pool input",
            required: channels * plane,
            actual: input.len(),
        });
    }
    let out_len = channels * n * n;
    if output.len() < out_len {
        return Err(StepError::BufferTooSmall {
            buffer: "pool output",
            required: out_len,
            actual: output.len(),
        });
    }

    let area = (pool_size * pool_size) as f32;
    for c in 0..channels {
        let src = &input[c * plane..(c + 1) * plane];
        let dst = &mut output[c * n * n..(c + 1) * n * n];
        for bi in 0..n {
            for bj in 0..n {
                let r0 = bi * pool_size;
                let c0 = bj * pool_size;
                let mut acc = match kernel {
                    PoolKernel::Max => f32::NEG_INFINITY,
                    PoolKernel::Sum | PoolKernel::AbsSum | PoolKernel::Mean => 0.0,
                };
                for r in r0..r0 + pool_size {
                    let row = &src[r * in_side + c0..r * in_side + c0 + pool_size];
                    for &v in row {
                        match kernel {
                            PoolKernel::Sum | PoolKernel::Mean => acc += v,
                            PoolKernel::AbsSum => acc += v.abs(),
                            PoolKernel::Max => {
                                if v > acc {
                                    acc = v;
                                }
                            }
                        }
                    }
                }
                dst[bi * n + bj] = match kernel {
                    PoolKernel::Mean => acc / area,
                    PoolKernel::Sum | PoolKernel::AbsSum | PoolKernel::Max => acc,
                };
            }
        }
    }
    Ok(())
}

/// Per-worker scratch for [`GridPooler`] (holds the blurred planes).
#[derive(Clone, Debug, Default)]
pub struct PoolScratch {
    blurred: Vec<f32>,
}

/// Blur-then-pool stage shared by every engine.
///
/// Immutable and `Sync`; per-call state lives in a [`PoolScratch`] so
/// parallel workers can share one pooler.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPooler {
    side: usize,
    n: usize,
    pool_size: usize,
    blur_size: usize,
    kernel: PoolKernel,
    channels: usize,
}

impl GridPooler {
    /// Pooler for a (validated) grid configuration with `channels`
    /// feature channels.
    pub fn new(config: &GridConfig, channels: usize) -> Self {
        Self {
            side: config.sub_grid_side(),
            n: config.n,
            pool_size: config.pool_size,
            blur_size: config.blur_size,
            kernel: config.kernel,
            channels,
        }
    }

    /// Length of the planes this pooler consumes.
    pub fn planes_len(&self) -> usize {
        self.channels * self.side * self.side
    }

    /// Length of the descriptor this pooler produces.
    pub fn descriptor_len(&self) -> usize {
        self.channels * self.n * self.n
    }

    /// Scratch sized for this pooler.
    pub fn scratch(&self) -> PoolScratch {
        let out_side = blurred_side(self.side, self.blur_size);
        let blurred = if self.blur_size == 0 {
            Vec::new()
        } else {
            vec![0.0; self.channels * out_side * out_side]
        };
        PoolScratch { blurred }
    }

    /// Blur (if configured) and pool channel-major `planes` into
    /// `output[..descriptor_len()]`.
    pub fn pool_into(
        &self,
        planes: &[f32],
        scratch: &mut PoolScratch,
        output: &mut [f32],
    ) -> Result<(), StepError> {
        if self.blur_size == 0 {
            return pool_blocks_into(
                planes,
                self.channels,
                self.side,
                self.pool_size,
                self.n,
                self.kernel,
                output,
            );
        }
        let out_side = blurred_side(self.side, self.blur_size);
        let needed = self.channels * out_side * out_side;
        if scratch.blurred.len() < needed {
            scratch.blurred.resize(needed, 0.0);
        }
        let blurred_side = box_blur_into(
            planes,
            self.channels,
            self.side,
            self.blur_size,
            &mut scratch.blurred,
        )?;
        pool_blocks_into(
            &scratch.blurred,
            self.channels,
            blurred_side,
            self.pool_size,
            self.n,
            self.kernel,
            output,
        )
    }
}
