//! The driver-facing surface of the engine.
//!
//! The repair control loop itself (budgets, termination, action execution)
//! lives with the collaborator. This coordinator is the single interface it
//! needs: request an action, report the outcome of applying it, record the
//! trajectory, and checkpoint the learned table.
//!
//! One repair attempt is a strict sequence of
//! request -> apply (external) -> record -> append steps; everything here
//! is synchronous except the persistence checkpoints.

use tracing::{info, info_span};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Action, AppliedAction, Diagnostic, Solution};
use crate::domain::ports::RepairableModel;
use crate::services::knowledge_service::Knowledge;
use crate::services::reward_calculator::RewardCalculator;

/// How the driver wants the next action chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Take the best-known action.
    Exploit,
    /// Take a uniformly random action for exploration.
    Explore,
}

/// Coordinates one or more repair attempts against the shared knowledge
/// base.
///
/// Sequential use only: the knowledge base has no internal
/// synchronization, so concurrent sessions need external mutual exclusion.
pub struct RepairCoordinator {
    knowledge: Knowledge,
    reward_calculator: RewardCalculator,
    save_after_reward: bool,
    next_solution_id: i64,
}

impl RepairCoordinator {
    /// Create a coordinator over the given knowledge base and calculator.
    ///
    /// With `save_after_reward` set, every finalized solution checkpoints
    /// the knowledge base; otherwise saving is deferred to explicit
    /// [`RepairCoordinator::save`] calls.
    pub fn new(
        knowledge: Knowledge,
        reward_calculator: RewardCalculator,
        save_after_reward: bool,
    ) -> Self {
        Self {
            knowledge,
            reward_calculator,
            save_after_reward,
            next_solution_id: 1,
        }
    }

    /// Start a fresh repair attempt.
    pub fn begin_attempt(&mut self) -> Solution {
        let solution_id = self.next_solution_id;
        self.next_solution_id += 1;
        let attempt_id = Uuid::new_v4();
        info!(%attempt_id, solution_id, "repair attempt started");
        Solution::new(solution_id)
    }

    /// Feed a candidate action reported by the collaborator into the table
    /// (first-encounter registration; re-registration overwrites).
    pub fn register_action(&mut self, error_code: i32, context_id: i32, action: Action) {
        self.knowledge.insert_action(error_code, context_id, action);
    }

    /// Request an action for the given error code.
    ///
    /// `Exploit` returns `None` when nothing has been learned for the code
    /// yet; `Explore` fails with a recoverable error for an unknown code or
    /// an empty context, letting the driver fall back.
    pub fn request_action(
        &mut self,
        error_code: i32,
        mode: SelectionMode,
    ) -> DomainResult<Option<Action>> {
        match mode {
            SelectionMode::Exploit => Ok(self.knowledge.optimal_action(error_code)),
            SelectionMode::Explore => self.knowledge.random_action(error_code).map(Some),
        }
    }

    /// Let result-based preferences snapshot the model before the chosen
    /// action is applied externally.
    pub fn before_action(&mut self, model: &dyn RepairableModel) {
        self.reward_calculator.before_action(model);
    }

    /// Record one applied step: score it, fold the reward into the live
    /// table weight and the solution's aggregate, and append a snapshot of
    /// the step to the trajectory.
    ///
    /// Returns the computed reward.
    pub fn record_step(
        &mut self,
        solution: &mut Solution,
        model: &dyn RepairableModel,
        diagnostic: &Diagnostic,
        action: &Action,
    ) -> DomainResult<i64> {
        let span = info_span!("record_step", solution_id = solution.id, error_code = diagnostic.code);
        let _guard = span.enter();

        let reward = self.reward_calculator.calculate_reward_for(
            self.knowledge.qtable_mut(),
            model,
            diagnostic,
            action,
        )?;

        let context_id = action.hierarchy;
        let qtable = self.knowledge.qtable_mut();
        let old_weight = qtable.weight(diagnostic.code, context_id, action.id)?;
        let new_weight = old_weight + reward as f64;
        qtable.set_weight(diagnostic.code, context_id, action.id, new_weight)?;

        solution.weight += reward as f64;
        solution.record(AppliedAction::new(
            diagnostic.clone(),
            action.clone(),
            new_weight,
        ));

        Ok(reward)
    }

    /// Accept a finished solution: flat reinforcement of every step, and a
    /// checkpoint of the knowledge base when configured to save after
    /// rewards.
    ///
    /// Returns the total reinforcement applied to the table.
    pub async fn finalize_solution(&mut self, solution: &Solution) -> DomainResult<i64> {
        let total = self
            .reward_calculator
            .reward_solution(solution, self.knowledge.qtable_mut())?;
        info!(
            solution_id = solution.id,
            steps = solution.len(),
            reinforcement = total,
            "solution rewarded"
        );
        if self.save_after_reward {
            self.knowledge.save().await?;
        }
        Ok(total)
    }

    /// Compare a finished batch of solutions via the configured post-repair
    /// preferences, which may adjust both solution aggregates and table
    /// weights.
    pub fn finalize_batch(&mut self, solutions: &mut [Solution]) -> DomainResult<()> {
        self.reward_calculator
            .reward_post_repair(solutions, self.knowledge.qtable_mut())
    }

    /// Explicitly checkpoint the knowledge base.
    pub async fn save(&self) -> DomainResult<()> {
        self.knowledge.save().await
    }

    /// Reset every learned weight to zero for full relearning.
    pub fn clear_weights(&mut self) {
        self.knowledge.qtable_mut().clear_weights();
    }

    /// Warm-start the table from persisted tag dictionaries, filtered to
    /// the configured preferences.
    pub fn influence_weights_from_preferences_by(&mut self, factor: f64) {
        self.reward_calculator
            .influence_weights_from_preferences_by(self.knowledge.qtable_mut(), factor);
    }

    /// Read access to the underlying knowledge base.
    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    /// Mutable access to the underlying knowledge base (load at startup,
    /// direct table surgery in tests).
    pub fn knowledge_mut(&mut self) -> &mut Knowledge {
        &mut self.knowledge
    }
}
