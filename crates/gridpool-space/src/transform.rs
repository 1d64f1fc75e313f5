//! Ego-relative coordinates, relative velocities and heading rotation.
//!
//! All functions here are pure. The rotation used for front alignment is
//! an explicit [`Rotation2`] applied to whole batches of vectors so that
//! the indexer downstream never has to know about orientation.

use std::f64::consts::FRAC_PI_2;

use gridpool_core::Point2;

/// A 2x2 rotation acting on row vectors: `v' = v · M`.
///
/// `M = [[cos t, sin t], [-sin t, cos t]]`, which rotates vectors
/// counter-clockwise by `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation2 {
    m: [[f32; 2]; 2],
}

impl Rotation2 {
    /// The identity rotation.
    pub const IDENTITY: Rotation2 = Rotation2 {
        m: [[1.0, 0.0], [0.0, 1.0]],
    };

    /// Counter-clockwise rotation by `theta` radians.
    pub fn from_angle(theta: f64) -> Self {
        let (st, ct) = theta.sin_cos();
        let (ct, st) = (ct as f32, st as f32);
        Self {
            m: [[ct, st], [-st, ct]],
        }
    }

    /// Rotation that maps the displacement `prev -> now` onto the
    /// positive axis-1 direction ("forward").
    ///
    /// `theta = pi/2 - atan2(dy, dx)`. Returns `None` if either position
    /// is missing. A zero displacement is well defined (`atan2(0, 0) = 0`)
    /// and yields a quarter turn.
    pub fn heading(prev: Point2, now: Point2) -> Option<Self> {
        if prev.is_missing() || now.is_missing() {
            return None;
        }
        let d = now - prev;
        let heading = (d.y as f64).atan2(d.x as f64);
        Some(Self::from_angle(FRAC_PI_2 - heading))
    }

    /// Rotate a single vector.
    pub fn apply(&self, v: Point2) -> Point2 {
        Point2::new(
            v.x * self.m[0][0] + v.y * self.m[1][0],
            v.x * self.m[0][1] + v.y * self.m[1][1],
        )
    }

    /// Rotate every vector in place.
    pub fn apply_batch(&self, vs: &mut [Point2]) {
        for v in vs.iter_mut() {
            *v = self.apply(*v);
        }
    }
}

/// Per-agent displacement over one step: `now - prev`.
pub fn velocity(prev: Point2, now: Point2) -> Point2 {
    now - prev
}

/// All ordered pairwise differences `values[j] - values[i]` for `j != i`.
///
/// Output is `N * (N - 1)` entries grouped by `i`, with `j` ascending and
/// the diagonal removed. This is the batched counterpart of
/// [`EgoFrame::offsets_into`] and produces the same values in the same
/// order for a world-aligned frame.
pub fn pairwise_differences(values: &[Point2], out: &mut Vec<Point2>) {
    let n = values.len();
    out.clear();
    out.reserve(n * n.saturating_sub(1));
    for (i, &origin) in values.iter().enumerate() {
        for (j, &v) in values.iter().enumerate() {
            if j != i {
                out.push(v - origin);
            }
        }
    }
}

/// The ego's reference frame for one step.
///
/// Holds the ego's current position, optionally its velocity (for
/// relative-velocity features), and optionally the heading rotation when
/// the grid is front-aligned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EgoFrame {
    origin: Point2,
    velocity: Option<Point2>,
    rotation: Option<Rotation2>,
}

impl EgoFrame {
    /// World-axis frame centred on `origin`.
    pub fn world(origin: Point2) -> Self {
        Self {
            origin,
            velocity: None,
            rotation: None,
        }
    }

    /// Heading-aligned frame centred on `origin`, facing away from `prev`.
    ///
    /// Returns `None` if either position is missing.
    pub fn aligned(origin: Point2, prev: Point2) -> Option<Self> {
        let rotation = Rotation2::heading(prev, origin)?;
        Some(Self {
            origin,
            velocity: None,
            rotation: Some(rotation),
        })
    }

    /// Attach the ego's own velocity, subtracted from neighbour velocities.
    pub fn with_velocity(mut self, velocity: Point2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// The ego's current position.
    pub fn origin(&self) -> Point2 {
        self.origin
    }

    /// The ego's velocity, if attached.
    pub fn velocity(&self) -> Option<Point2> {
        self.velocity
    }

    /// The heading rotation, if the frame is front-aligned.
    pub fn rotation(&self) -> Option<&Rotation2> {
        self.rotation.as_ref()
    }

    /// Write `q - origin` for every `q`, rotated into the frame.
    pub fn offsets_into(&self, others: impl IntoIterator<Item = Point2>, out: &mut Vec<Point2>) {
        out.clear();
        out.extend(others.into_iter().map(|q| q - self.origin));
        if let Some(r) = &self.rotation {
            r.apply_batch(out);
        }
    }

    /// Write `v - ego_velocity` for every neighbour velocity `v`, rotated
    /// into the frame. A frame without velocity treats the ego as static.
    pub fn relative_velocities_into(
        &self,
        others: impl IntoIterator<Item = Point2>,
        out: &mut Vec<Point2>,
    ) {
        let ego = self.velocity.unwrap_or(Point2::ZERO);
        out.clear();
        out.extend(others.into_iter().map(|v| v - ego));
        if let Some(r) = &self.rotation {
            r.apply_batch(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Point2, b: Point2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn identity_leaves_vectors_alone() {
        let v = Point2::new(1.5, -2.0);
        assert_eq!(Rotation2::IDENTITY.apply(v), v);
        assert!(close(Rotation2::from_angle(0.0).apply(v), v));
    }

    #[test]
    fn quarter_turn_is_counter_clockwise() {
        let r = Rotation2::from_angle(FRAC_PI_2);
        assert!(close(r.apply(Point2::new(1.0, 0.0)), Point2::new(0.0, 1.0)));
        assert!(close(r.apply(Point2::new(0.0, 1.0)), Point2::new(-1.0, 0.0)));
    }

    #[test]
    fn heading_maps_motion_to_forward_axis() {
        // Moving along +x: forward must become +y.
        let r = Rotation2::heading(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)).unwrap();
        assert!(close(r.apply(Point2::new(1.0, 0.0)), Point2::new(0.0, 1.0)));
        // Neighbour on the ego's left (+y in world) lands on -x (lateral).
        assert!(close(r.apply(Point2::new(0.0, 1.0)), Point2::new(-1.0, 0.0)));

        // Moving along -y.
        let r = Rotation2::heading(Point2::new(0.0, 1.0), Point2::new(0.0, 0.0)).unwrap();
        assert!(close(r.apply(Point2::new(0.0, -3.0)), Point2::new(0.0, 3.0)));
    }

    #[test]
    fn heading_of_stationary_agent_is_quarter_turn() {
        let p = Point2::new(4.0, 4.0);
        let r = Rotation2::heading(p, p).unwrap();
        assert_eq!(r, Rotation2::from_angle(FRAC_PI_2));
    }

    #[test]
    fn heading_undefined_for_missing_positions() {
        assert!(Rotation2::heading(Point2::MISSING, Point2::ZERO).is_none());
        assert!(Rotation2::heading(Point2::ZERO, Point2::MISSING).is_none());
        assert!(EgoFrame::aligned(Point2::ZERO, Point2::MISSING).is_none());
    }

    #[test]
    fn pairwise_differences_drop_diagonal_in_order() {
        let v = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        let mut out = Vec::new();
        pairwise_differences(&v, &mut out);
        assert_eq!(
            out,
            vec![
                Point2::new(1.0, 0.0),
                Point2::new(0.0, 2.0),
                Point2::new(-1.0, 0.0),
                Point2::new(-1.0, 2.0),
                Point2::new(0.0, -2.0),
                Point2::new(1.0, -2.0),
            ]
        );
    }

    #[test]
    fn pairwise_differences_of_single_or_empty_is_empty() {
        let mut out = vec![Point2::ZERO];
        pairwise_differences(&[Point2::new(1.0, 1.0)], &mut out);
        assert!(out.is_empty());
        pairwise_differences(&[], &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn world_frame_offsets_are_plain_differences() {
        let frame = EgoFrame::world(Point2::new(1.0, 1.0));
        let mut out = Vec::new();
        frame.offsets_into([Point2::new(2.0, 3.0), Point2::new(0.0, 0.0)], &mut out);
        assert_eq!(out, vec![Point2::new(1.0, 2.0), Point2::new(-1.0, -1.0)]);
    }

    #[test]
    fn relative_velocities_subtract_ego_and_rotate() {
        // Ego moving +x at speed 1; neighbour moving +x at speed 3.
        let frame = EgoFrame::aligned(Point2::new(1.0, 0.0), Point2::new(0.0, 0.0))
            .unwrap()
            .with_velocity(Point2::new(1.0, 0.0));
        let mut out = Vec::new();
        frame.relative_velocities_into([Point2::new(3.0, 0.0)], &mut out);
        // Relative (2, 0) in world, forward in the ego frame.
        assert!(close(out[0], Point2::new(0.0, 2.0)));
    }

    #[test]
    fn static_ego_frame_passes_velocities_through() {
        let frame = EgoFrame::world(Point2::ZERO);
        let mut out = Vec::new();
        frame.relative_velocities_into([Point2::new(0.5, -0.5)], &mut out);
        assert_eq!(out, vec![Point2::new(0.5, -0.5)]);
    }

    proptest! {
        #[test]
        fn rotation_preserves_length(
            theta in -6.3f64..6.3,
            x in -50.0f32..50.0,
            y in -50.0f32..50.0,
        ) {
            let v = Point2::new(x, y);
            let r = Rotation2::from_angle(theta).apply(v);
            prop_assert!((r.norm() - v.norm()).abs() < 1e-3);
        }

        #[test]
        fn heading_always_points_forward(
            px in -10.0f32..10.0, py in -10.0f32..10.0,
            dx in -5.0f32..5.0, dy in -5.0f32..5.0,
        ) {
            prop_assume!(dx.hypot(dy) > 1e-2);
            let prev = Point2::new(px, py);
            let now = Point2::new(px + dx, py + dy);
            let r = Rotation2::heading(prev, now).unwrap();
            let f = r.apply(now - prev);
            prop_assert!(f.x.abs() < 1e-3);
            prop_assert!(f.y > 0.0);
        }
    }
}
