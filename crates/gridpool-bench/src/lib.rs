//! Benchmark profiles for the gridpool descriptor engines.
//!
//! - [`reference_config`]: the default 4x4 grid with 8x8 sub-cells.
//! - [`crowd`]: a deterministic crowd of `agents` pedestrians.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gridpool_core::{Point2, Variant};
use gridpool_engine::{EngineConfig, Execution};

/// Default grid (`cell_side = 2`, `n = 4`, `pool_size = 8`) with the
/// given variant and execution mode.
pub fn reference_config(variant: Variant, execution: Execution) -> EngineConfig {
    EngineConfig {
        variant,
        execution,
        ..EngineConfig::default()
    }
}

/// Owned positions, previous positions and hidden rows for one step.
pub struct Crowd {
    /// Current positions.
    pub now: Vec<Point2>,
    /// Positions one step earlier.
    pub prev: Vec<Point2>,
    /// Row-major hidden states, `hidden_dim` per agent.
    pub hidden: Vec<f32>,
}

/// Deterministic crowd of `agents` in a square sized so that, on
/// average, a handful of neighbours fall inside each ego's 8 x 8 grid.
///
/// Placement uses a multiplicative hash of `seed`; no RNG state.
pub fn crowd(agents: usize, hidden_dim: usize, seed: u64) -> Crowd {
    let side = (agents as f32).sqrt() * 2.5 + 1.0;
    let mut now = Vec::with_capacity(agents);
    let mut prev = Vec::with_capacity(agents);
    for i in 0..agents as u64 {
        let h = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407));
        let x = unit(h) * side;
        let y = unit(h.rotate_left(21)) * side;
        let heading = unit(h.rotate_left(42)) * std::f32::consts::TAU;
        let p = Point2::new(x, y);
        now.push(p);
        prev.push(p - Point2::new(0.4 * heading.cos(), 0.4 * heading.sin()));
    }
    let hidden = (0..agents * hidden_dim)
        .map(|k| ((k as f32) * 0.37).sin())
        .collect();
    Crowd { now, prev, hidden }
}

fn unit(h: u64) -> f32 {
    (h >> 40) as f32 / (1u64 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_validates() {
        let config = reference_config(Variant::Social { hidden_dim: 16 }, Execution::Parallel);
        config.validate().unwrap();
        assert_eq!(config.descriptor_len(), 4 * 4 * 16);
    }

    #[test]
    fn crowd_is_deterministic_and_moving() {
        let a = crowd(50, 4, 42);
        let b = crowd(50, 4, 42);
        assert_eq!(a.now, b.now);
        assert_eq!(a.hidden.len(), 200);
        for (n, p) in a.now.iter().zip(&a.prev) {
            assert!(((*n - *p).norm() - 0.4).abs() < 1e-4);
        }
    }
}
