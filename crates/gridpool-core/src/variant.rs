//! Neighbour-feature variants.

use std::fmt;

/// Which per-neighbour feature is scattered into the grid.
///
/// Combined with [`GridConfig::front`](crate::GridConfig::front) this
/// yields the occupancy / directional / social families and their
/// heading-aligned counterparts. The choice is fixed per engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Constant 1.0 per in-range neighbour (`pooling_dim = 1`).
    Occupancy,
    /// Neighbour velocity minus ego velocity (`pooling_dim = 2`).
    Directional,
    /// The neighbour's externally supplied feature vector, typically the
    /// sequence model's hidden state (`pooling_dim = hidden_dim`).
    Social {
        /// Width of each agent's hidden-state row.
        hidden_dim: usize,
    },
}

impl Variant {
    /// Number of feature channels each neighbour contributes.
    pub fn pooling_dim(&self) -> usize {
        match self {
            Self::Occupancy => 1,
            Self::Directional => 2,
            Self::Social { hidden_dim } => *hidden_dim,
        }
    }

    /// Whether the variant reads previous-step positions.
    pub fn needs_previous(&self) -> bool {
        matches!(self, Self::Directional)
    }

    /// Whether the variant reads per-agent hidden states.
    pub fn needs_hidden(&self) -> bool {
        matches!(self, Self::Social { .. })
    }

    /// Short lowercase name, used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Occupancy => "occupancy",
            Self::Directional => "directional",
            Self::Social { .. } => "social",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Social { hidden_dim } => write!(f, "social(h={hidden_dim})"),
            other => f.write_str(other.name()),
        }
    }
}
