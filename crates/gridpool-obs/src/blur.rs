//! Optional stride-1 box blur applied to the sub-grid before pooling.
//!
//! The window is `blur_size x blur_size` with `blur_size / 2` zero
//! padding on every side, and the divisor is always the full window
//! area, padding included. Border sub-cells are therefore dampened
//! relative to interior ones. This asymmetry is kept as-is; pooled
//! descriptors of blurred grids depend on it.
//!
//! For even `blur_size` the blurred plane is one sub-cell wider than
//! the input; the pooler only reads the leading `n x n` blocks.

use gridpool_core::StepError;

/// Side of the blurred plane for an input of `side` sub-cells.
///
/// `blur_size == 0` means no blur and returns `side`.
pub fn blurred_side(side: usize, blur_size: usize) -> usize {
    if blur_size == 0 {
        return side;
    }
    let pad = blur_size / 2;
    (side + 2 * pad + 1).saturating_sub(blur_size)
}

/// Blur `channels` square planes of `side x side` into `output`.
///
/// Returns the output side. `output` needs at least
/// `channels * blurred_side(side, blur_size)^2` elements.
pub fn box_blur_into(
    input: &[f32],
    channels: usize,
    side: usize,
    blur_size: usize,
    output: &mut [f32],
) -> Result<usize, StepError> {
    let plane = side * side;
    if input.len() < channels * plane {
        return Err(StepError::BufferTooSmall {
            buffer: "blur input",
            required: channels * plane,
            actual: input.len(),
        });
    }
    let out_side = blurred_side(side, blur_size);
    let out_plane = out_side * out_side;
    if output.len() < channels * out_plane {
        return Err(StepError::BufferTooSmall {
            buffer: "blur output",
            required: channels * out_plane,
            actual: output.len(),
        });
    }

    if blur_size == 0 {
        output[..channels * plane].copy_from_slice(&input[..channels * plane]);
        return Ok(side);
    }

    let pad = (blur_size / 2) as isize;
    let area = (blur_size * blur_size) as f32;
    let side_i = side as isize;

    for c in 0..channels {
        let src = &input[c * plane..(c + 1) * plane];
        let dst = &mut output[c * out_plane..(c + 1) * out_plane];
        for i in 0..out_side {
            for j in 0..out_side {
                let mut acc = 0.0f32;
                for ki in 0..blur_size {
                    let r = i as isize + ki as isize - pad;
                    if r < 0 || r >= side_i {
                        continue;
                    }
                    for kj in 0..blur_size {
                        let col = j as isize + kj as isize - pad;
                        if col < 0 || col >= side_i {
                            continue;
                        }
                        acc += src[r as usize * side + col as usize];
                    }
                }
                dst[i * out_side + j] = acc / area;
            }
        }
    }

    Ok(out_side)
}
