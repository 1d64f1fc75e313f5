//! Last-write scatter of neighbour features into sub-grid planes.
//!
//! Planes are channel-major: channel `c` of sub-cell `k` lives at
//! `planes[c * cell_count + k]`. This is the `(channels, side, side)`
//! layout the pooler reads directly.
//!
//! # Aggregation policy
//!
//! When several neighbours bin into the same sub-cell, the one written
//! **last** wins outright; values are not summed or averaged. Engines
//! write neighbours in ascending index order, so the highest-indexed
//! neighbour in a cell determines its value. Embeddings trained on this
//! reduction depend on it; do not switch to accumulation without
//! retraining the consumer. Collisions are counted in
//! [`ScatterStats::overwrites`].

use gridpool_core::StepError;

/// Counters for one scatter target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScatterStats {
    /// Number of neighbour writes.
    pub writes: usize,
    /// Writes that replaced an earlier neighbour in the same sub-cell.
    pub overwrites: usize,
}

impl ScatterStats {
    /// True if nothing was written (the planes are all zero).
    pub fn is_empty(&self) -> bool {
        self.writes == 0
    }
}

/// A zeroed, borrowed scatter destination for one ego agent.
#[derive(Debug)]
pub struct ScatterTarget<'a> {
    planes: &'a mut [f32],
    occupied: &'a mut [bool],
    cell_count: usize,
    channels: usize,
    stats: ScatterStats,
}

impl<'a> ScatterTarget<'a> {
    /// Wrap caller buffers, zeroing the used prefix of both.
    ///
    /// `planes` needs at least `channels * cell_count` elements and
    /// `occupied` at least `cell_count`.
    pub fn new(
        planes: &'a mut [f32],
        occupied: &'a mut [bool],
        cell_count: usize,
        channels: usize,
    ) -> Result<Self, StepError> {
        let required = channels * cell_count;
        if planes.len() < required {
            return Err(StepError::BufferTooSmall {
                buffer: "scatter planes",
                required,
                actual: planes.len(),
            });
        }
        if occupied.len() < cell_count {
            return Err(StepError::BufferTooSmall {
                buffer: "scatter occupancy",
                required: cell_count,
                actual: occupied.len(),
            });
        }
        Ok(Self::zeroed(
            &mut planes[..required],
            &mut occupied[..cell_count],
            cell_count,
            channels,
        ))
    }

    fn zeroed(
        planes: &'a mut [f32],
        occupied: &'a mut [bool],
        cell_count: usize,
        channels: usize,
    ) -> Self {
        planes.fill(0.0);
        occupied.fill(false);
        Self {
            planes,
            occupied,
            cell_count,
            channels,
            stats: ScatterStats::default(),
        }
    }

    fn claim(&mut self, cell: usize) {
        debug_assert!(cell < self.cell_count, "sub-cell {cell} out of range");
        if self.occupied[cell] {
            self.stats.overwrites += 1;
        } else {
            self.occupied[cell] = true;
        }
        self.stats.writes += 1;
    }

    /// Write a full feature vector (`channels` values) into `cell`,
    /// replacing whatever an earlier neighbour wrote there.
    pub fn write(&mut self, cell: usize, value: &[f32]) {
        debug_assert_eq!(value.len(), self.channels);
        self.claim(cell);
        for (c, &v) in value.iter().enumerate().take(self.channels) {
            self.planes[c * self.cell_count + cell] = v;
        }
    }

    /// Write the same value into every channel of `cell`.
    pub fn write_splat(&mut self, cell: usize, value: f32) {
        self.claim(cell);
        for c in 0..self.channels {
            self.planes[c * self.cell_count + cell] = value;
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> ScatterStats {
        self.stats
    }

    /// The channel-major planes.
    pub fn planes(&self) -> &[f32] {
        self.planes
    }
}

/// Owned scatter buffers for one ego at a time.
///
/// [`target`](Self::target) hands out a zeroed [`ScatterTarget`] over
/// the internal buffers, so one aggregator can be reused for every
/// agent processed by the same worker.
#[derive(Clone, Debug)]
pub struct GridAggregator {
    planes: Vec<f32>,
    occupied: Vec<bool>,
    cell_count: usize,
    channels: usize,
}

impl GridAggregator {
    /// Buffers for `cell_count` sub-cells of `channels` features.
    pub fn new(cell_count: usize, channels: usize) -> Self {
        Self {
            planes: vec![0.0; cell_count * channels],
            occupied: vec![false; cell_count],
            cell_count,
            channels,
        }
    }

    /// Number of sub-cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Number of feature channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Zero the buffers and return a target writing into them.
    pub fn target(&mut self) -> ScatterTarget<'_> {
        ScatterTarget::zeroed(
            &mut self.planes,
            &mut self.occupied,
            self.cell_count,
            self.channels,
        )
    }

    /// The planes as left by the last target.
    pub fn planes(&self) -> &[f32] {
        &self.planes
    }
}
