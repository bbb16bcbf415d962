//! End-to-end reward pipeline: drive repair attempts through the
//! coordinator and verify table updates, trajectory records, post-repair
//! ranking, and persistence checkpoints.

use std::sync::Arc;

use mender::adapters::JsonKnowledgeStore;
use mender::domain::models::{Action, Diagnostic, PreferenceWeights};
use mender::domain::ports::{KnowledgeStore, RepairableModel};
use mender::{
    Knowledge, PreferenceOption, RepairCoordinator, RewardCalculator, SelectionMode,
};

/// Model stub whose fingerprint the test flips to simulate modification.
struct StubModel(u64);

impl RepairableModel for StubModel {
    fn fingerprint(&self) -> u64 {
        self.0
    }
}

fn coordinator_with(
    store: Arc<JsonKnowledgeStore>,
    options: &[PreferenceOption],
    save_after_reward: bool,
) -> RepairCoordinator {
    let knowledge = Knowledge::new(store, Some(11));
    let calculator =
        RewardCalculator::new(options.to_vec(), &PreferenceWeights::default()).unwrap();
    RepairCoordinator::new(knowledge, calculator, save_after_reward)
}

fn store_in(dir: &tempfile::TempDir) -> Arc<JsonKnowledgeStore> {
    Arc::new(JsonKnowledgeStore::new(dir.path().join("knowledge.json")))
}

#[tokio::test]
async fn test_full_attempt_updates_table_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let mut coordinator = coordinator_with(store.clone(), &[], true);

    let action = Action::new(1, 1, 0, "restore containment");
    coordinator.register_action(401, 1, action.clone());

    let mut solution = coordinator.begin_attempt();
    let model = StubModel(0);
    let diagnostic = Diagnostic::new(401, "broken containment");

    coordinator.before_action(&model);
    let reward = coordinator
        .record_step(&mut solution, &model, &diagnostic, &action)
        .unwrap();
    assert_eq!(reward, 30); // baseline only, no shaping preferences

    let reinforcement = coordinator.finalize_solution(&solution).await.unwrap();
    assert_eq!(reinforcement, 300);

    // save_after_reward wrote a checkpoint containing the learned weight.
    let persisted = store.load().await.unwrap().unwrap();
    assert!((persisted.weight(401, 1, 1).unwrap() - 330.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_short_sequence_batch_rewards_only_the_winner() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_with(
        store_in(&dir),
        &[PreferenceOption::ShortSequencesOfActions],
        false,
    );
    let model = StubModel(0);

    // Attempt 1: three steps. Attempt 2: five steps.
    let mut solutions = Vec::new();
    for (attempt, step_count) in [(0i32, 3i32), (100, 5)] {
        let mut solution = coordinator.begin_attempt();
        for step in 0..step_count {
            let error_code = attempt + step;
            let action = Action::new(step + 1, 1, 0, format!("fix {error_code}"));
            coordinator.register_action(error_code, 1, action.clone());
            coordinator
                .record_step(
                    &mut solution,
                    &model,
                    &Diagnostic::new(error_code, "diag"),
                    &action,
                )
                .unwrap();
        }
        solutions.push(solution);
    }

    // Both aggregates are positive (baseline 30 per step).
    assert!((solutions[0].weight - 90.0).abs() < f64::EPSILON);
    assert!((solutions[1].weight - 150.0).abs() < f64::EPSILON);

    coordinator.finalize_batch(&mut solutions).unwrap();

    // The shorter attempt won: aggregate bumped by the configured weight.
    assert!((solutions[0].weight - 190.0).abs() < f64::EPSILON);
    assert!((solutions[1].weight - 150.0).abs() < f64::EPSILON);

    let qtable = coordinator.knowledge().qtable();
    // Winner steps: 30 from the step reward + 300 post-repair bonus, and
    // the preference's 500 tag.
    for error_code in 0..3 {
        assert!((qtable.weight(error_code, 1, error_code + 1).unwrap() - 330.0).abs()
            < f64::EPSILON);
        assert_eq!(
            qtable
                .tag_dictionary(error_code, 1, error_code + 1)
                .unwrap()
                .value(PreferenceOption::ShortSequencesOfActions.id()),
            Some(500)
        );
    }
    // Loser steps keep only their step rewards.
    for step in 0..5 {
        let error_code = 100 + step;
        assert!((qtable.weight(error_code, 1, step + 1).unwrap() - 30.0).abs() < f64::EPSILON);
    }
}

#[tokio::test]
async fn test_result_based_preference_scores_modification() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_with(
        store_in(&dir),
        &[PreferenceOption::PunishModificationOfModel],
        false,
    );

    let action = Action::new(1, 1, 0, "rewrite references");
    coordinator.register_action(5, 1, action.clone());
    let mut solution = coordinator.begin_attempt();
    let diagnostic = Diagnostic::new(5, "diag");

    // Snapshot fingerprint 1, apply externally, model now fingerprints 2.
    coordinator.before_action(&StubModel(1));
    let reward = coordinator
        .record_step(&mut solution, &StubModel(2), &diagnostic, &action)
        .unwrap();

    // -50 for the modification, +30 baseline (punish_modification is not a
    // shaping preference).
    assert_eq!(reward, -20);

    // Unchanged model contributes nothing beyond the baseline.
    coordinator.before_action(&StubModel(2));
    let reward = coordinator
        .record_step(&mut solution, &StubModel(2), &diagnostic, &action)
        .unwrap();
    assert_eq!(reward, 30);
}

#[tokio::test]
async fn test_explore_after_registration_is_deterministic_under_seed() {
    let dir = tempfile::tempdir().unwrap();
    let make = || {
        let mut coordinator = coordinator_with(store_in(&dir), &[], false);
        for id in 1..=10 {
            coordinator.register_action(9, 1, Action::new(id, 1, 0, format!("a{id}")));
        }
        coordinator
    };

    let mut first = make();
    let mut second = make();
    let a = first.request_action(9, SelectionMode::Explore).unwrap().unwrap();
    let b = second.request_action(9, SelectionMode::Explore).unwrap().unwrap();
    assert_eq!(a.id, b.id);
}

#[tokio::test]
async fn test_warm_start_biases_only_configured_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_with(
        store_in(&dir),
        &[PreferenceOption::PunishDeletion],
        false,
    );

    let mut tagged = Action::new(1, 1, 0, "delete element");
    tagged
        .tags
        .set_value(PreferenceOption::PunishDeletion.id(), -100);
    let mut other = Action::new(2, 1, 0, "rename element");
    other
        .tags
        .set_value(PreferenceOption::ShortSequencesOfActions.id(), 900);
    coordinator.register_action(1, 1, tagged);
    coordinator.register_action(1, 1, other);

    coordinator.influence_weights_from_preferences_by(2.0);

    let qtable = coordinator.knowledge().qtable();
    assert!((qtable.weight(1, 1, 1).unwrap() + 200.0).abs() < f64::EPSILON);
    assert!(qtable.weight(1, 1, 2).unwrap().abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_clear_weights_supports_full_relearning() {
    let dir = tempfile::tempdir().unwrap();
    let mut coordinator = coordinator_with(store_in(&dir), &[], false);

    let action = Action::new(1, 1, 0, "fix it");
    coordinator.register_action(1, 1, action.clone());
    let mut solution = coordinator.begin_attempt();
    coordinator
        .record_step(&mut solution, &StubModel(0), &Diagnostic::new(1, "d"), &action)
        .unwrap();

    coordinator.clear_weights();
    assert!(coordinator
        .knowledge()
        .qtable()
        .weight(1, 1, 1)
        .unwrap()
        .abs()
        < f64::EPSILON);
}
