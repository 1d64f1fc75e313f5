//! Reusable scene fixtures.
//!
//! - [`SceneBuilder`]: seeded random crowds (ChaCha8) with previous
//!   positions, optional hidden states and unobserved agents.
//! - [`ring`]: agents evenly spaced on a circle around an ego.
//! - [`rotate_about`]: rigidly rotate a whole scene.

use gridpool_core::{Point2, SceneStep};
use gridpool_space::Rotation2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

/// Owned inputs for one scene step.
#[derive(Clone, Debug)]
pub struct Scene {
    pub now: Vec<Point2>,
    pub prev: Vec<Point2>,
    pub hidden: Vec<f32>,
    pub hidden_dim: usize,
}

impl Scene {
    pub fn agents(&self) -> usize {
        self.now.len()
    }

    /// Borrow every supplied input as a step.
    pub fn step(&self) -> SceneStep<'_> {
        let step = SceneStep::new(&self.now).with_previous(&self.prev);
        if self.hidden_dim == 0 {
            step
        } else {
            step.with_hidden(&self.hidden)
        }
    }

    /// Current positions only.
    pub fn positions_only(&self) -> SceneStep<'_> {
        SceneStep::new(&self.now)
    }

    /// Mark `agent` unobserved at the current step.
    pub fn hide(&mut self, agent: usize) {
        self.now[agent] = Point2::MISSING;
    }

    /// Mark `agent`'s previous position unobserved.
    pub fn hide_previous(&mut self, agent: usize) {
        self.prev[agent] = Point2::MISSING;
    }
}

/// Seeded random scene generator.
#[derive(Clone, Debug)]
pub struct SceneBuilder {
    seed: u64,
    agents: usize,
    extent: f32,
    max_speed: f32,
    hidden_dim: usize,
}

impl SceneBuilder {
    pub fn new(seed: u64, agents: usize) -> Self {
        Self {
            seed,
            agents,
            extent: 4.0,
            max_speed: 0.5,
            hidden_dim: 0,
        }
    }

    /// Agents are placed uniformly in `[-extent, extent)^2`.
    pub fn extent(mut self, extent: f32) -> Self {
        self.extent = extent;
        self
    }

    /// Per-step displacement magnitude is in `[0.05, max_speed)`.
    pub fn max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn hidden_dim(mut self, hidden_dim: usize) -> Self {
        self.hidden_dim = hidden_dim;
        self
    }

    pub fn build(self) -> Scene {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut now = Vec::with_capacity(self.agents);
        let mut prev = Vec::with_capacity(self.agents);
        for _ in 0..self.agents {
            let p = Point2::new(
                rng.random_range(-self.extent..self.extent),
                rng.random_range(-self.extent..self.extent),
            );
            let speed = rng.random_range(0.05..self.max_speed.max(0.051));
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            now.push(p);
            prev.push(p - Point2::new(speed * angle.cos(), speed * angle.sin()));
        }
        let hidden = (0..self.agents * self.hidden_dim)
            .map(|_| rng.random_range(-1.0f32..1.0))
            .collect();
        Scene {
            now,
            prev,
            hidden,
            hidden_dim: self.hidden_dim,
        }
    }
}

/// `count` agents on a circle of `radius` around `centre`, preceded by
/// the centre itself (agent 0). Everyone moves by `step` between frames.
pub fn ring(centre: Point2, radius: f32, count: usize, step: Point2) -> Scene {
    let mut now = vec![centre];
    for k in 0..count {
        let a = std::f32::consts::TAU * k as f32 / count as f32;
        now.push(centre + Point2::new(radius * a.cos(), radius * a.sin()));
    }
    let prev = now.iter().map(|&p| p - step).collect();
    Scene {
        now,
        prev,
        hidden: Vec::new(),
        hidden_dim: 0,
    }
}

/// Rotate every position in `points` by `theta` radians (counter-clockwise)
/// about `centre`. Missing positions stay missing.
pub fn rotate_about(points: &[Point2], centre: Point2, theta: f64) -> Vec<Point2> {
    let m = Rotation2::from_angle(theta);
    points
        .iter()
        .map(|&p| {
            if p.is_missing() {
                p
            } else {
                centre + m.apply(p - centre)
            }
        })
        .collect()
}

/// Assert element-wise `|a - b| <= tol`.
#[track_caller]
pub fn assert_close(a: &[f32], b: &[f32], tol: f32) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(
            (x - y).abs() <= tol,
            "element {i}: {x} vs {y} (tol {tol})"
        );
    }
}

/// Install a test-writer subscriber honouring `RUST_LOG`. Safe to call
/// from every test.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_is_deterministic() {
        let a = SceneBuilder::new(7, 10).hidden_dim(3).build();
        let b = SceneBuilder::new(7, 10).hidden_dim(3).build();
        assert_eq!(a.now, b.now);
        assert_eq!(a.prev, b.prev);
        assert_eq!(a.hidden, b.hidden);
        assert_eq!(a.hidden.len(), 30);
        let c = SceneBuilder::new(8, 10).build();
        assert_ne!(a.now, c.now);
    }

    #[test]
    fn every_agent_moves() {
        let s = SceneBuilder::new(1, 20).build();
        for (n, p) in s.now.iter().zip(&s.prev) {
            assert!((*n - *p).norm() >= 0.04);
        }
    }

    #[test]
    fn rotate_quarter_turn() {
        let pts = [Point2::new(2.0, 1.0), Point2::MISSING];
        let r = rotate_about(&pts, Point2::new(1.0, 1.0), std::f64::consts::FRAC_PI_2);
        assert!((r[0].x - 1.0).abs() < 1e-6);
        assert!((r[0].y - 2.0).abs() < 1e-6);
        assert!(r[1].is_missing());
    }

    #[test]
    fn ring_layout() {
        let s = ring(Point2::ZERO, 1.0, 4, Point2::new(0.0, 0.1));
        assert_eq!(s.agents(), 5);
        assert_eq!(s.now[0], Point2::ZERO);
        assert!((s.now[1].x - 1.0).abs() < 1e-6);
        assert!((s.prev[0].y + 0.1).abs() < 1e-6);
    }
}
