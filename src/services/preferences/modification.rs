//! Result-based preferences comparing the model before and after an action.
//!
//! Both variants snapshot the model fingerprint in `before_action` and
//! score against the post-action fingerprint. A step scored without a
//! preceding snapshot contributes nothing.

use crate::domain::models::{Action, Diagnostic, PreferenceOption};
use crate::domain::ports::RepairableModel;

use super::StepPreference;

/// Punishes actions that change the original model.
pub struct PunishModificationOfModel {
    weight: i64,
    fingerprint_before: Option<u64>,
}

impl PunishModificationOfModel {
    /// Create the preference with its configured weight.
    pub fn new(weight: i64) -> Self {
        Self {
            weight,
            fingerprint_before: None,
        }
    }
}

impl StepPreference for PunishModificationOfModel {
    fn option(&self) -> PreferenceOption {
        PreferenceOption::PunishModificationOfModel
    }

    fn before_action(&mut self, model: &dyn RepairableModel) {
        self.fingerprint_before = Some(model.fingerprint());
    }

    fn reward_action_for_error(
        &mut self,
        model: &dyn RepairableModel,
        _diagnostic: &Diagnostic,
        _action: &Action,
    ) -> i64 {
        match self.fingerprint_before.take() {
            Some(before) if before != model.fingerprint() => -self.weight,
            _ => 0,
        }
    }
}

/// Rewards actions that change the original model.
pub struct RewardModificationOfModel {
    weight: i64,
    fingerprint_before: Option<u64>,
}

impl RewardModificationOfModel {
    /// Create the preference with its configured weight.
    pub fn new(weight: i64) -> Self {
        Self {
            weight,
            fingerprint_before: None,
        }
    }
}

impl StepPreference for RewardModificationOfModel {
    fn option(&self) -> PreferenceOption {
        PreferenceOption::RewardModificationOfModel
    }

    fn before_action(&mut self, model: &dyn RepairableModel) {
        self.fingerprint_before = Some(model.fingerprint());
    }

    fn reward_action_for_error(
        &mut self,
        model: &dyn RepairableModel,
        _diagnostic: &Diagnostic,
        _action: &Action,
    ) -> i64 {
        match self.fingerprint_before.take() {
            Some(before) if before != model.fingerprint() => self.weight,
            _ => 0,
        }
    }
}
