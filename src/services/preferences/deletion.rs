//! Preference punishing actions that delete model elements.

use crate::domain::models::{Action, Diagnostic, PreferenceOption};
use crate::domain::ports::RepairableModel;

use super::StepPreference;

/// Punishes deletion actions by the full configured weight.
///
/// Deleting the broken element is often the cheapest way to silence a
/// diagnostic; this preference biases the table toward repairs that keep
/// model content instead.
pub struct PunishDeletion {
    weight: i64,
}

impl PunishDeletion {
    /// Create the preference with its configured weight.
    pub fn new(weight: i64) -> Self {
        Self { weight }
    }
}

impl StepPreference for PunishDeletion {
    fn option(&self) -> PreferenceOption {
        PreferenceOption::PunishDeletion
    }

    fn reward_action_for_error(
        &mut self,
        _model: &dyn RepairableModel,
        _diagnostic: &Diagnostic,
        action: &Action,
    ) -> i64 {
        if action.is_deletion() {
            -self.weight
        } else {
            0
        }
    }
}
