//! Post-repair preferences ranking solutions by trajectory length.
//!
//! Both variants scan the finished batch for solutions with positive
//! weight, pick a winner by step count (ties broken by higher weight), add
//! their configured weight to the winner's aggregate, and reinforce every
//! step of the winning trajectory in the knowledge table.

use crate::domain::errors::DomainResult;
use crate::domain::models::{PreferenceOption, QTable, Solution};

use super::PostRepairPreference;
use crate::services::reward_calculator::{STEP_REINFORCEMENT, TAG_REINFORCEMENT};

/// Select the index of the winning solution among those with positive
/// weight. `prefer_shorter` picks the fewest steps, otherwise the most;
/// equal step counts resolve to the higher aggregate weight.
fn select_winner(solutions: &[Solution], prefer_shorter: bool) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for (index, solution) in solutions.iter().enumerate() {
        if solution.weight <= 0.0 {
            continue;
        }
        winner = match winner {
            None => Some(index),
            Some(current) => {
                let best = &solutions[current];
                let better_length = if prefer_shorter {
                    solution.len() < best.len()
                } else {
                    solution.len() > best.len()
                };
                let better_tie = solution.len() == best.len() && solution.weight > best.weight;
                if better_length || better_tie {
                    Some(index)
                } else {
                    Some(current)
                }
            }
        };
    }
    winner
}

/// Reinforce every step of the winning trajectory: a fixed increment to the
/// step's table weight and a fixed bonus accumulated into its tag entry for
/// the rewarding preference.
fn reinforce_winning_steps(
    solution: &Solution,
    qtable: &mut QTable,
    preference_id: i32,
) -> DomainResult<()> {
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
        qtable.add_tag_value(error_code, context_id, action_id, preference_id, TAG_REINFORCEMENT)?;
    }
    Ok(())
}

/// Rewards the shortest positively-weighted solution in a batch.
pub struct PreferShortSequencesOfActions {
    weight: i64,
}

impl PreferShortSequencesOfActions {
    /// Create the preference with its configured weight.
    pub fn new(weight: i64) -> Self {
        Self { weight }
    }
}

impl PostRepairPreference for PreferShortSequencesOfActions {
    fn option(&self) -> PreferenceOption {
        PreferenceOption::ShortSequencesOfActions
    }

    fn reward_post_repair(
        &mut self,
        solutions: &mut [Solution],
        qtable: &mut QTable,
    ) -> DomainResult<()> {
        let Some(index) = select_winner(solutions, true) else {
            return Ok(());
        };
        let solution = &mut solutions[index];
        solution.weight += self.weight as f64;
        reinforce_winning_steps(solution, qtable, self.option().id())?;
        tracing::info!(
            solution_id = solution.id,
            preference_weight = self.weight,
            steps = solution.len(),
            "rewarded solution for preferring shorter sequences of actions"
        );
        Ok(())
    }
}

/// Rewards the longest positively-weighted solution in a batch.
pub struct PreferLongSequencesOfActions {
    weight: i64,
}

impl PreferLongSequencesOfActions {
    /// Create the preference with its configured weight.
    pub fn new(weight: i64) -> Self {
        Self { weight }
    }
}

impl PostRepairPreference for PreferLongSequencesOfActions {
    fn option(&self) -> PreferenceOption {
        PreferenceOption::LongSequencesOfActions
    }

    fn reward_post_repair(
        &mut self,
        solutions: &mut [Solution],
        qtable: &mut QTable,
    ) -> DomainResult<()> {
        let Some(index) = select_winner(solutions, false) else {
            return Ok(());
        };
        let solution = &mut solutions[index];
        solution.weight += self.weight as f64;
        reinforce_winning_steps(solution, qtable, self.option().id())?;
        tracing::info!(
            solution_id = solution.id,
            preference_weight = self.weight,
            steps = solution.len(),
            "rewarded solution for preferring longer sequences of actions"
        );
        Ok(())
    }
}
