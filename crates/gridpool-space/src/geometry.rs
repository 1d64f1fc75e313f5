//! Sub-grid geometry: offset binning and range-violation detection.
//!
//! [`SubGrid`] maps an ego-frame offset to a sub-cell coordinate with
//!
//! ```text
//! cell[a] = floor(o[a] / (cell_side / pool_size) + shift[a])
//! ```
//!
//! where `shift` is `side / 2` on centred axes and `0` on the forward
//! axis of a front-aligned grid. A neighbour is in range iff every axis
//! coordinate lies in `[0, side)`; anything else is rejected, never
//! wrapped or clamped. The canonical rank is `cell[0] * side + cell[1]`.

use gridpool_core::{GridConfig, Point2};

/// Where the ego sits inside the sub-grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridOrigin {
    /// Ego at the centre of both axes. Covers
    /// `[-n*cell_side/2, n*cell_side/2)` on each axis.
    Centered,
    /// Ego centred on the lateral axis (0) and at the near edge of the
    /// forward axis (1). Covers `[0, n*cell_side)` ahead of the ego.
    Forward,
}

impl GridOrigin {
    /// Origin implied by the configuration's `front` flag.
    pub fn for_config(config: &GridConfig) -> Self {
        if config.front {
            Self::Forward
        } else {
            Self::Centered
        }
    }
}

/// Binning geometry of the `(n * pool_size)^2` sub-grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SubGrid {
    side: usize,
    sub_cell_side: f32,
    shift: [f32; 2],
    origin: GridOrigin,
}

impl SubGrid {
    /// Geometry for a (validated) grid configuration.
    pub fn new(config: &GridConfig) -> Self {
        Self::with_origin(config, GridOrigin::for_config(config))
    }

    /// Geometry with an explicit origin, regardless of `config.front`.
    pub fn with_origin(config: &GridConfig, origin: GridOrigin) -> Self {
        let side = config.sub_grid_side();
        let half = side as f32 / 2.0;
        let shift = match origin {
            GridOrigin::Centered => [half, half],
            GridOrigin::Forward => [half, 0.0],
        };
        Self {
            side,
            sub_cell_side: config.sub_cell_side(),
            shift,
            origin,
        }
    }

    /// Sub-cells per axis.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total sub-cells.
    pub fn cell_count(&self) -> usize {
        self.side * self.side
    }

    /// The ego's placement.
    pub fn origin(&self) -> GridOrigin {
        self.origin
    }

    /// Continuous (pre-floor) sub-grid coordinate of an offset.
    pub fn continuous_coord(&self, offset: Point2) -> [f32; 2] {
        [
            offset.x / self.sub_cell_side + self.shift[0],
            offset.y / self.sub_cell_side + self.shift[1],
        ]
    }

    /// Sub-cell coordinate of an offset, or `None` on a range violation.
    ///
    /// NaN offsets are always out of range.
    pub fn cell_coord(&self, offset: Point2) -> Option<[usize; 2]> {
        let [u, v] = self.continuous_coord(offset);
        let side = self.side as f32;
        let in_range = |c: f32| c >= 0.0 && c < side;
        if !(in_range(u) && in_range(v)) {
            return None;
        }
        // Non-negative, so truncation is floor.
        Some([u as usize, v as usize])
    }

    /// Whether an integer sub-cell coordinate lies inside the grid.
    pub fn in_bounds(&self, coord: [i64; 2]) -> bool {
        let side = self.side as i64;
        coord.iter().all(|&c| c >= 0 && c < side)
    }

    /// Linear index of a sub-cell: `coord[0] * side + coord[1]`.
    pub fn canonical_rank(&self, coord: [usize; 2]) -> usize {
        debug_assert!(coord[0] < self.side && coord[1] < self.side);
        coord[0] * self.side + coord[1]
    }

    /// Linear sub-cell index of an offset, or `None` if out of range.
    pub fn cell_index(&self, offset: Point2) -> Option<usize> {
        self.cell_coord(offset).map(|c| self.canonical_rank(c))
    }
}
