//! Preferences rewarding repairs by their depth in the context hierarchy.
//!
//! Hierarchy level 1 is the top of the modeled structure. The two variants
//! mirror each other with inverted sign: one rewards fixing problems near
//! the top, the other near the bottom. Contributions use truncating integer
//! arithmetic on the configured weight (full weight, two thirds, or a
//! 74% penalty).

use crate::domain::models::{Action, Diagnostic, PreferenceOption};
use crate::domain::ports::RepairableModel;

use super::StepPreference;

/// Rewards actions applied high in the context hierarchy.
pub struct PreferRepairingHighInContextHierarchy {
    weight: i64,
}

impl PreferRepairingHighInContextHierarchy {
    /// Create the preference with its configured weight.
    pub fn new(weight: i64) -> Self {
        Self { weight }
    }
}

impl StepPreference for PreferRepairingHighInContextHierarchy {
    fn option(&self) -> PreferenceOption {
        PreferenceOption::RepairHighInContextHierarchy
    }

    fn reward_action_for_error(
        &mut self,
        _model: &dyn RepairableModel,
        _diagnostic: &Diagnostic,
        action: &Action,
    ) -> i64 {
        if action.hierarchy == 1 {
            self.weight
        } else if action.hierarchy == 2 {
            self.weight * 2 / 3
        } else if action.hierarchy > 2 {
            -(self.weight * 74 / 100)
        } else {
            0
        }
    }
}

/// Rewards actions applied low in the context hierarchy.
pub struct PreferRepairingLowInContextHierarchy {
    weight: i64,
}

impl PreferRepairingLowInContextHierarchy {
    /// Create the preference with its configured weight.
    pub fn new(weight: i64) -> Self {
        Self { weight }
    }
}

impl StepPreference for PreferRepairingLowInContextHierarchy {
    fn option(&self) -> PreferenceOption {
        PreferenceOption::RepairLowInContextHierarchy
    }

    fn reward_action_for_error(
        &mut self,
        _model: &dyn RepairableModel,
        _diagnostic: &Diagnostic,
        action: &Action,
    ) -> i64 {
        if action.hierarchy == 1 {
            -(self.weight * 74 / 100)
        } else if action.hierarchy == 2 {
            self.weight * 2 / 3
        } else if action.hierarchy > 2 {
            self.weight
        } else {
            0
        }
    }
}
