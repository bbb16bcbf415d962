//! The innermost table level: actions registered within one context.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::models::action::Action;

/// Actions available within a single context, keyed by action id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTable {
    actions: BTreeMap<i32, Action>,
}

impl ActionTable {
    /// Create an empty action table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table seeded with one action (tables are only ever created
    /// because an action is being registered).
    pub fn with_action(action: Action) -> Self {
        let mut table = Self::new();
        table.insert(action);
        table
    }

    /// Whether the given action id is registered.
    pub fn contains(&self, action_id: i32) -> bool {
        self.actions.contains_key(&action_id)
    }

    /// The id of the highest-weight action.
    ///
    /// The scan walks ascending action ids and replaces the candidate only
    /// on strictly greater weight, so among equal weights the lowest id
    /// wins. Returns `None` for an empty table.
    pub fn best_action_key(&self) -> Option<i32> {
        let mut entries = self.actions.iter();
        let (first_id, first_action) = entries.next()?;
        let mut best_id = *first_id;
        let mut best_action = first_action;
        for (id, action) in entries {
            if action.compare_weight(best_action).is_gt() {
                best_id = *id;
                best_action = action;
            }
        }
        Some(best_id)
    }

    /// The highest-weight action, or `None` for an empty table.
    pub fn best_action(&self) -> Option<&Action> {
        self.best_action_key().and_then(|id| self.actions.get(&id))
    }

    /// A uniformly random action, or `None` for an empty table.
    pub fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Action> {
        if self.actions.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.actions.len());
        self.actions.values().nth(index)
    }

    /// Insert or overwrite an action, keyed by its id.
    pub fn insert(&mut self, action: Action) {
        self.actions.insert(action.id, action);
    }

    /// The action registered under the given id.
    pub fn action(&self, action_id: i32) -> Option<&Action> {
        self.actions.get(&action_id)
    }

    /// Mutable access to the action registered under the given id.
    pub fn action_mut(&mut self, action_id: i32) -> Option<&mut Action> {
        self.actions.get_mut(&action_id)
    }

    /// Reset every action's weight to zero.
    pub fn clear_weights(&mut self) {
        for action in self.actions.values_mut() {
            action.weight = 0.0;
        }
    }

    /// Apply warm-start bias to every action from its tag dictionary.
    pub fn influence_weights_from_preferences_by(&mut self, factor: f64, active_ids: &[i32]) {
        for action in self.actions.values_mut() {
            action.influence_weight_from_preferences_by(factor, active_ids);
        }
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the table holds no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate `(action_id, action)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Action)> {
        self.actions.iter().map(|(id, action)| (*id, action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table_with_weights(weights: &[(i32, f64)]) -> ActionTable {
        let mut table = ActionTable::new();
        for (id, weight) in weights {
            let mut action = Action::new(*id, 1, 0, format!("action {id}"));
            action.weight = *weight;
            table.insert(action);
        }
        table
    }

    #[test]
    fn test_best_action_key_picks_maximum_weight() {
        let table = table_with_weights(&[
            (1, 100.0),
            (2, 230.0),
            (3, 901.0),
            (4, 0.0),
            (5, -1000.0),
        ]);
        assert_eq!(table.best_action_key(), Some(3));
    }

    #[test]
    fn test_best_action_key_on_empty_table_is_none() {
        let table = ActionTable::new();
        assert_eq!(table.best_action_key(), None);
        assert!(table.best_action().is_none());
    }

    #[test]
    fn test_equal_weights_resolve_to_lowest_id() {
        let table = table_with_weights(&[(9, 50.0), (2, 50.0), (5, 50.0)]);
        assert_eq!(table.best_action_key(), Some(2));
    }

    #[test]
    fn test_random_action_is_deterministic_under_seed() {
        let table = table_with_weights(&[(1, 0.0), (2, 0.0), (3, 0.0)]);
        let mut first = StdRng::seed_from_u64(7);
        let mut second = StdRng::seed_from_u64(7);
        let a = table.random_action(&mut first).unwrap().id;
        let b = table.random_action(&mut second).unwrap().id;
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_action_on_empty_table_is_none() {
        let table = ActionTable::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(table.random_action(&mut rng).is_none());
    }

    #[test]
    fn test_clear_weights_zeroes_everything() {
        let mut table = table_with_weights(&[(1, 10.0), (2, -3.0)]);
        table.clear_weights();
        assert!(table.iter().all(|(_, a)| a.weight == 0.0));
    }
}
