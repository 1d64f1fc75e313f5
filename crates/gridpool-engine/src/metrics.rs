//! Per-call counters returned next to the descriptors.
//!
//! [`StepMetrics`] summarises one `compute` call: how long it took and
//! where each considered (ego, neighbour) pair ended up.

/// Timing and neighbour accounting for a single `compute` call.
///
/// Every considered pair is exactly one of: masked, out of range, or
/// binned. Binned writes that replaced an earlier neighbour in the same
/// sub-cell are also counted in `cell_overwrites`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the whole call, in microseconds.
    pub total_us: u64,
    /// Agents in the step.
    pub agents: usize,
    /// Ordered (ego, neighbour) pairs examined, self-pairs excluded.
    pub pairs_considered: usize,
    /// Neighbours written into a sub-cell.
    pub neighbors_binned: usize,
    /// Neighbours dropped for lying outside the grid.
    pub out_of_range: usize,
    /// Neighbours dropped as unobserved.
    pub masked: usize,
    /// Binned writes that overwrote an earlier neighbour (last-write).
    pub cell_overwrites: usize,
    /// Agents whose descriptor is all zeros by construction.
    pub degenerate_agents: usize,
}

impl StepMetrics {
    /// Add another set of counters into this one. Timing and agent
    /// count are left untouched; the engine sets them once per call.
    pub fn merge(mut self, other: StepMetrics) -> StepMetrics {
        self.pairs_considered += other.pairs_considered;
        self.neighbors_binned += other.neighbors_binned;
        self.out_of_range += other.out_of_range;
        self.masked += other.masked;
        self.cell_overwrites += other.cell_overwrites;
        self.degenerate_agents += other.degenerate_agents;
        self
    }

    /// Fraction of considered pairs that were binned, or 0 if none were
    /// considered.
    pub fn binned_ratio(&self) -> f64 {
        if self.pairs_considered == 0 {
            0.0
        } else {
            self.neighbors_binned as f64 / self.pairs_considered as f64
        }
    }
}
