//! Aggregates configured preferences into rewards and reinforcements.

use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Action, Diagnostic, PreferenceOption, PreferenceWeights, QTable, Solution,
};
use crate::domain::ports::RepairableModel;
use crate::services::preferences::PreferenceSet;

/// Flat increment added to every step of an accepted solution.
///
/// Tunable with no derived meaning; the weights in the table are additive
/// counters, and persisted tables depend on this literal value.
pub const STEP_REINFORCEMENT: i64 = 300;

/// Bonus accumulated into a step's tag entry when a post-repair preference
/// rewards its solution. Tunable, see [`STEP_REINFORCEMENT`].
pub const TAG_REINFORCEMENT: i64 = 500;

/// Baseline reward granted when no hierarchy- or deletion-shaping
/// preference is configured, so an unshaped table still accumulates signal.
pub const BASELINE_EXPLORATION_REWARD: i64 = 30;

/// Service computing per-step rewards and applying solution reinforcement.
///
/// Holds the configured preferences, split by capability at construction.
/// The knowledge table is passed into each call rather than owned, keeping
/// one mutable owner (the coordinator) for the table.
pub struct RewardCalculator {
    options: Vec<PreferenceOption>,
    preferences: PreferenceSet,
}

impl RewardCalculator {
    /// Build a calculator for the given options and configured weights.
    ///
    /// Fails fast on a duplicate option (configuration error).
    pub fn new(options: Vec<PreferenceOption>, weights: &PreferenceWeights) -> DomainResult<Self> {
        let preferences = PreferenceSet::build(&options, weights)?;
        Ok(Self {
            options,
            preferences,
        })
    }

    /// The configured preference options, in registration order.
    pub fn options(&self) -> &[PreferenceOption] {
        &self.options
    }

    /// Give result-based preferences the chance to snapshot pre-action
    /// model state. Call before the chosen action is applied.
    pub fn before_action(&mut self, model: &dyn RepairableModel) {
        for preference in &mut self.preferences.step {
            preference.before_action(model);
        }
    }

    /// Score the decision to apply `action` to `diagnostic`, given the
    /// post-action model.
    ///
    /// The reward is the sum over every configured per-step preference;
    /// each non-zero contribution is recorded in the action's tag
    /// dictionary under the preference's id, an audit trail of *why* the
    /// weight moved. When none of the hierarchy/deletion-shaping
    /// preferences is configured, a flat [`BASELINE_EXPLORATION_REWARD`]
    /// is added.
    pub fn calculate_reward_for(
        &mut self,
        qtable: &mut QTable,
        model: &dyn RepairableModel,
        diagnostic: &Diagnostic,
        action: &Action,
    ) -> DomainResult<i64> {
        let mut reward = 0;
        let context_id = action.hierarchy;

        for preference in &mut self.preferences.step {
            let contribution = preference.reward_action_for_error(model, diagnostic, action);
            if contribution != 0 {
                qtable.set_tag_value(
                    diagnostic.code,
                    context_id,
                    action.id,
                    preference.option().id(),
                    contribution,
                )?;
            }
            reward += contribution;
        }

        if !self.has_shaping_preference() {
            reward += BASELINE_EXPLORATION_REWARD;
        }

        debug!(
            error_code = diagnostic.code,
            action_id = action.id,
            context_id,
            reward,
            "calculated step reward"
        );
        Ok(reward)
    }

    /// Run every configured post-repair preference over a finished batch,
    /// in registration order. Later preferences observe the weight
    /// adjustments earlier ones made.
    pub fn reward_post_repair(
        &mut self,
        solutions: &mut [Solution],
        qtable: &mut QTable,
    ) -> DomainResult<()> {
        for preference in &mut self.preferences.post_repair {
            preference.reward_post_repair(solutions, qtable)?;
        }
        Ok(())
    }

    /// Baseline reinforcement for an accepted solution: add
    /// [`STEP_REINFORCEMENT`] to the table weight of every recorded step,
    /// regardless of the solution's aggregate weight.
    ///
    /// Deliberately a flat additive update: no discounting, no future-value
    /// term. Returns the total increment applied.
    pub fn reward_solution(&self, solution: &Solution, qtable: &mut QTable) -> DomainResult<i64> {
        for step in &solution.sequence {
            let error_code = step.diagnostic.code;
            let context_id = step.action.hierarchy;
            let action_id = step.action.id;

            let old_weight = qtable.weight(error_code, context_id, action_id)?;
            qtable.set_weight(
                error_code,
                context_id,
                action_id,
                old_weight + STEP_REINFORCEMENT as f64,
            )?;
        }
        Ok(STEP_REINFORCEMENT * solution.len() as i64)
    }

    /// Warm-start the table from prior tag dictionaries, filtered to the
    /// configured preference ids.
    pub fn influence_weights_from_preferences_by(&self, qtable: &mut QTable, factor: f64) {
        let active_ids: Vec<i32> = self.options.iter().map(|option| option.id()).collect();
        qtable.influence_weights_from_preferences_by(factor, &active_ids);
    }

    fn has_shaping_preference(&self) -> bool {
        self.options.iter().any(|option| {
            matches!(
                option,
                PreferenceOption::RepairHighInContextHierarchy
                    | PreferenceOption::RepairLowInContextHierarchy
                    | PreferenceOption::PunishDeletion
            )
        })
    }
}
