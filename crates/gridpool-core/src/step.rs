//! Borrowed view of one scene step.

use crate::error::StepError;
use crate::point::Point2;
use crate::variant::Variant;

/// All caller-owned inputs for one time step.
///
/// Agents are indexed `0..N` consistently across every input. The core
/// only reads these slices; nothing is retained after the call.
///
/// - `positions`: current position per agent (`N` entries, may contain
///   [`Point2::MISSING`]).
/// - `prev_positions`: position at the previous step, required by the
///   directional variant and by front alignment.
/// - `hidden_states`: row-major `N x H` feature matrix, required by the
///   social variant.
///
/// # Examples
///
/// ```
/// use gridpool_core::{Point2, SceneStep, Variant};
///
/// let now = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
/// let prev = [Point2::new(0.0, -1.0), Point2::new(1.0, 0.5)];
/// let step = SceneStep::new(&now).with_previous(&prev);
/// assert_eq!(step.agent_count(), 2);
/// step.validate(&Variant::Directional, false).unwrap();
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SceneStep<'a> {
    /// Current positions.
    pub positions: &'a [Point2],
    /// Previous-step positions, if supplied.
    pub prev_positions: Option<&'a [Point2]>,
    /// Row-major hidden-state matrix, if supplied.
    pub hidden_states: Option<&'a [f32]>,
}

impl<'a> SceneStep<'a> {
    /// A step with current positions only.
    pub fn new(positions: &'a [Point2]) -> Self {
        Self {
            positions,
            prev_positions: None,
            hidden_states: None,
        }
    }

    /// Attach previous-step positions.
    pub fn with_previous(mut self, prev_positions: &'a [Point2]) -> Self {
        self.prev_positions = Some(prev_positions);
        self
    }

    /// Attach the row-major hidden-state matrix.
    pub fn with_hidden(mut self, hidden_states: &'a [f32]) -> Self {
        self.hidden_states = Some(hidden_states);
        self
    }

    /// Number of agents `N` at this step.
    pub fn agent_count(&self) -> usize {
        self.positions.len()
    }

    /// Check that every input the variant needs is present and that all
    /// supplied inputs agree on the agent count.
    ///
    /// Inputs that are supplied but not needed are still shape-checked:
    /// unused previous positions must have `N` entries and an unused
    /// hidden matrix must hold a whole number of rows per agent.
    pub fn validate(&self, variant: &Variant, front: bool) -> Result<(), StepError> {
        let n = self.agent_count();

        match self.prev_positions {
            Some(prev) if prev.len() != n => {
                return Err(StepError::ShapeMismatch {
                    input: "prev_positions",
                    expected: n,
                    actual: prev.len(),
                });
            }
            None if front || variant.needs_previous() => {
                return Err(StepError::MissingInput {
                    input: "prev_positions",
                });
            }
            _ => {}
        }

        match (self.hidden_states, variant) {
            (Some(hidden), Variant::Social { hidden_dim }) => {
                let expected = n * hidden_dim;
                if hidden.len() != expected {
                    return Err(StepError::ShapeMismatch {
                        input: "hidden_states",
                        expected,
                        actual: hidden.len(),
                    });
                }
            }
            (None, Variant::Social { .. }) => {
                return Err(StepError::MissingInput {
                    input: "hidden_states",
                });
            }
            // Width is unknown here, so only whole rows per agent are checked.
            (Some(hidden), _) => {
                let ragged = match n {
                    0 => !hidden.is_empty(),
                    _ => hidden.len() % n != 0,
                };
                if ragged {
                    return Err(StepError::ShapeMismatch {
                        input: "hidden_states",
                        expected: n * (hidden.len() / n.max(1)),
                        actual: hidden.len(),
                    });
                }
            }
            (None, _) => {}
        }

        Ok(())
    }

    /// Previous position of `agent`, if previous positions were supplied.
    pub fn previous(&self, agent: usize) -> Option<Point2> {
        self.prev_positions.and_then(|p| p.get(agent).copied())
    }

    /// Hidden-state row of `agent` for rows of width `hidden_dim`.
    pub fn hidden_row(&self, agent: usize, hidden_dim: usize) -> Option<&'a [f32]> {
        let start = agent.checked_mul(hidden_dim)?;
        self.hidden_states?.get(start..start + hidden_dim)
    }
}
