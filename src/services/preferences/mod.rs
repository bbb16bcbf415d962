//! Reward-shaping preference implementations.
//!
//! Preferences come in two capabilities, resolved at configuration time:
//!
//! - [`StepPreference`] scores one (diagnostic, action) decision. The
//!   default [`StepPreference::before_action`] hook is a no-op; result-based
//!   preferences override it to snapshot pre-action model state for
//!   before/after comparison.
//! - [`PostRepairPreference`] compares completed trajectories against each
//!   other once a batch of repair attempts finishes, with access to mutate
//!   the knowledge table directly.
//!
//! Preferences are additive and independent: the reward calculator never
//! short-circuits on one preference's result, and a zero-weight preference
//! simply contributes nothing.

mod deletion;
mod hierarchy;
mod modification;
mod sequence_length;

pub use deletion::PunishDeletion;
pub use hierarchy::{PreferRepairingHighInContextHierarchy, PreferRepairingLowInContextHierarchy};
pub use modification::{PunishModificationOfModel, RewardModificationOfModel};
pub use sequence_length::{PreferLongSequencesOfActions, PreferShortSequencesOfActions};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Action, Diagnostic, PreferenceOption, PreferenceWeights, QTable, Solution,
};
use crate::domain::ports::RepairableModel;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// A preference scoring a single repair decision.
pub trait StepPreference: Send + Sync {
    /// Which configured option this preference implements.
    fn option(&self) -> PreferenceOption;

    /// Called before the chosen action is applied, so result-based
    /// preferences can snapshot pre-action model state. No-op by default.
    fn before_action(&mut self, _model: &dyn RepairableModel) {}

    /// Score the decision to apply `action` to `diagnostic`. The model is
    /// the post-action state.
    fn reward_action_for_error(
        &mut self,
        model: &dyn RepairableModel,
        diagnostic: &Diagnostic,
        action: &Action,
    ) -> i64;
}

/// A preference comparing completed trajectories against each other.
pub trait PostRepairPreference: Send + Sync {
    /// Which configured option this preference implements.
    fn option(&self) -> PreferenceOption;

    /// Score a batch of finished solutions, mutating solution weights and
    /// the knowledge table as appropriate.
    fn reward_post_repair(
        &mut self,
        solutions: &mut [Solution],
        qtable: &mut QTable,
    ) -> DomainResult<()>;
}

// ---------------------------------------------------------------------------
// PreferenceSet
// ---------------------------------------------------------------------------

/// The configured preferences, split by capability at construction time.
pub struct PreferenceSet {
    /// Per-step preferences, in registration order.
    pub step: Vec<Box<dyn StepPreference>>,
    /// Post-repair preferences, in registration order.
    pub post_repair: Vec<Box<dyn PostRepairPreference>>,
}

impl std::fmt::Debug for PreferenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceSet")
            .field("step", &self.step.len())
            .field("post_repair", &self.post_repair.len())
            .finish()
    }
}

impl PreferenceSet {
    /// Build the preference set for the given options and configured
    /// weights.
    ///
    /// Registration order is preserved within each capability list; a
    /// duplicate option is a configuration error surfaced immediately.
    pub fn build(
        options: &[PreferenceOption],
        weights: &PreferenceWeights,
    ) -> DomainResult<Self> {
        let mut seen = Vec::with_capacity(options.len());
        let mut set = Self {
            step: Vec::new(),
            post_repair: Vec::new(),
        };

        for &option in options {
            if seen.contains(&option) {
                return Err(DomainError::InvalidPreferenceConfiguration(format!(
                    "preference {option} is configured more than once"
                )));
            }
            seen.push(option);

            let weight = weights.weight_for(option);
            match option {
                PreferenceOption::ShortSequencesOfActions => set
                    .post_repair
                    .push(Box::new(PreferShortSequencesOfActions::new(weight))),
                PreferenceOption::LongSequencesOfActions => set
                    .post_repair
                    .push(Box::new(PreferLongSequencesOfActions::new(weight))),
                PreferenceOption::RepairHighInContextHierarchy => set
                    .step
                    .push(Box::new(PreferRepairingHighInContextHierarchy::new(weight))),
                PreferenceOption::RepairLowInContextHierarchy => set
                    .step
                    .push(Box::new(PreferRepairingLowInContextHierarchy::new(weight))),
                PreferenceOption::PunishDeletion => {
                    set.step.push(Box::new(PunishDeletion::new(weight)));
                }
                PreferenceOption::PunishModificationOfModel => set
                    .step
                    .push(Box::new(PunishModificationOfModel::new(weight))),
                PreferenceOption::RewardModificationOfModel => set
                    .step
                    .push(Box::new(RewardModificationOfModel::new(weight))),
            }
        }

        Ok(set)
    }
}
