//! Per-variant feature production.
//!
//! The [`VariantDispatcher`] is the only place that knows what a
//! neighbour contributes to its sub-cell. Everything downstream (scatter,
//! blur, pool) is variant-agnostic and sees `pooling_dim` channels.

use gridpool_core::{Point2, SceneStep, Variant};
use gridpool_space::{pairwise_differences, velocity, EgoFrame};

/// Builds ego frames and neighbour feature vectors for one variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariantDispatcher {
    variant: Variant,
    front: bool,
}

impl VariantDispatcher {
    /// Dispatcher for `variant`, optionally with heading-aligned grids.
    pub fn new(variant: Variant, front: bool) -> Self {
        Self { variant, front }
    }

    /// The configured variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether grids are heading-aligned.
    pub fn front(&self) -> bool {
        self.front
    }

    /// Feature channels per neighbour.
    pub fn pooling_dim(&self) -> usize {
        self.variant.pooling_dim()
    }

    /// Whether previous positions take part in the computation.
    pub fn needs_previous(&self) -> bool {
        self.front || self.variant.needs_previous()
    }

    /// Reference frame of agent `ego`.
    ///
    /// `None` means the ego's descriptor is all zeros: either the ego is
    /// unobserved or a previous position it needs is unobserved. A
    /// stationary ego still gets a frame (`atan2(0, 0) = 0`).
    pub fn ego_frame(&self, step: &SceneStep<'_>, ego: usize) -> Option<EgoFrame> {
        let origin = *step.positions.get(ego)?;
        if origin.is_missing() {
            return None;
        }
        let prev = if self.needs_previous() {
            let prev = step.previous(ego)?;
            if prev.is_missing() {
                return None;
            }
            Some(prev)
        } else {
            None
        };

        let frame = match (self.front, prev) {
            (true, Some(prev)) => EgoFrame::aligned(origin, prev)?,
            (true, None) => return None,
            (false, _) => EgoFrame::world(origin),
        };
        match (self.variant, prev) {
            (Variant::Directional, Some(prev)) => Some(frame.with_velocity(velocity(prev, origin))),
            (Variant::Directional, None) => None,
            _ => Some(frame),
        }
    }

    /// Whether neighbour `j` has everything its feature needs.
    pub fn neighbor_observed(&self, step: &SceneStep<'_>, j: usize) -> bool {
        let Some(now) = step.positions.get(j) else {
            return false;
        };
        if now.is_missing() {
            return false;
        }
        match self.variant {
            Variant::Directional => matches!(step.previous(j), Some(p) if !p.is_missing()),
            Variant::Occupancy | Variant::Social { .. } => true,
        }
    }

    /// Append the features of `neighbors`, seen from `frame`, to `out`
    /// (`pooling_dim` values per neighbour, in `neighbors` order).
    ///
    /// `velocities` is scratch for the directional variant.
    pub fn features_into(
        &self,
        step: &SceneStep<'_>,
        frame: &EgoFrame,
        neighbors: &[usize],
        velocities: &mut Vec<Point2>,
        out: &mut Vec<f32>,
    ) {
        out.clear();
        match self.variant {
            Variant::Occupancy => out.resize(neighbors.len(), 1.0),
            Variant::Directional => {
                frame.relative_velocities_into(
                    neighbors.iter().map(|&j| neighbor_velocity(step, j)),
                    velocities,
                );
                out.extend(velocities.iter().flat_map(|v| [v.x, v.y]));
            }
            Variant::Social { hidden_dim } => {
                for &j in neighbors {
                    push_hidden_row(step, j, hidden_dim, out);
                }
            }
        }
    }

    /// Append the features of every ordered pair `(i, j)`, `j != i`, in
    /// ego-major order with neighbours ascending. World frame only.
    pub fn pairwise_features_into(&self, step: &SceneStep<'_>, out: &mut Vec<f32>) {
        out.clear();
        let n = step.agent_count();
        let pairs = n * n.saturating_sub(1);
        match self.variant {
            Variant::Occupancy => out.resize(pairs, 1.0),
            Variant::Directional => {
                let velocities: Vec<Point2> = (0..n).map(|j| neighbor_velocity(step, j)).collect();
                let mut relative = Vec::with_capacity(pairs);
                pairwise_differences(&velocities, &mut relative);
                out.extend(relative.iter().flat_map(|v| [v.x, v.y]));
            }
            Variant::Social { hidden_dim } => {
                out.reserve(pairs * hidden_dim);
                for i in 0..n {
                    for j in (0..n).filter(|&j| j != i) {
                        push_hidden_row(step, j, hidden_dim, out);
                    }
                }
            }
        }
    }
}

fn neighbor_velocity(step: &SceneStep<'_>, j: usize) -> Point2 {
    match step.previous(j) {
        Some(prev) => velocity(prev, step.positions[j]),
        None => Point2::MISSING,
    }
}

// Rows are shape-checked before dispatch; a short row is zero-filled so
// feature offsets stay aligned.
fn push_hidden_row(step: &SceneStep<'_>, j: usize, hidden_dim: usize, out: &mut Vec<f32>) {
    match step.hidden_row(j, hidden_dim) {
        Some(row) => out.extend_from_slice(row),
        None => out.resize(out.len() + hidden_dim, 0.0),
    }
}
