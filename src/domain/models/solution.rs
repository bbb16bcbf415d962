//! Repair trajectories: ordered sequences of applied actions.
//!
//! A [`Solution`] is the record of one repair attempt. Each step snapshots
//! the action and the table weight that resulted from applying it, so a
//! finished trajectory reports the weights as they were at record time.
//! Later reinforcement mutates the live table only; history stays fixed.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::diagnostic::Diagnostic;

// ---------------------------------------------------------------------------
// AppliedAction
// ---------------------------------------------------------------------------

/// One executed step in a repair trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAction {
    /// The diagnostic the step addressed.
    pub diagnostic: Diagnostic,

    /// Snapshot of the action as it was applied.
    pub action: Action,

    /// Table weight of the action right after the step's reward was applied.
    pub resulting_weight: f64,
}

impl AppliedAction {
    /// Record a step, snapshotting the action and its resulting weight.
    pub fn new(diagnostic: Diagnostic, action: Action, resulting_weight: f64) -> Self {
        Self {
            diagnostic,
            action,
            resulting_weight,
        }
    }
}

impl std::fmt::Display for AppliedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error {} ({}) -> action {} ({}) at hierarchy {}/{}",
            self.diagnostic.code,
            self.diagnostic.message,
            self.action.id,
            self.action.message,
            self.action.hierarchy,
            self.action.sub_hierarchy,
        )
    }
}

// ---------------------------------------------------------------------------
// Solution
// ---------------------------------------------------------------------------

/// One complete repair trajectory plus its aggregate score.
///
/// Created when a repair attempt begins, appended to as actions are applied,
/// and treated as immutable once the attempt terminates -- except for
/// `weight`, which post-repair preferences may still adjust when ranking
/// solutions against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Identifier of the repair attempt that produced this trajectory.
    pub id: i64,

    /// Ordered sequence of applied steps.
    pub sequence: Vec<AppliedAction>,

    /// Running aggregate score used to rank solutions.
    pub weight: f64,
}

impl Solution {
    /// Create an empty solution for a new repair attempt.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            sequence: Vec::new(),
            weight: 0.0,
        }
    }

    /// Append a step to the trajectory.
    pub fn record(&mut self, step: AppliedAction) {
        self.sequence.push(step);
    }

    /// Number of applied steps.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether no steps have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_step_keeps_weight_snapshot() {
        let mut solution = Solution::new(1);
        let mut action = Action::new(7, 1, 0, "add missing type");
        action.weight = 42.0;

        solution.record(AppliedAction::new(
            Diagnostic::new(401, "missing type"),
            action.clone(),
            action.weight,
        ));

        // Mutating the caller's copy does not rewrite the recorded step.
        action.weight = 9000.0;
        assert!((solution.sequence[0].resulting_weight - 42.0).abs() < f64::EPSILON);
        assert_eq!(solution.len(), 1);
    }
}
