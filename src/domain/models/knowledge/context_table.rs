//! The middle table level: contexts registered under one error code.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::models::action::Action;

use super::action_table::ActionTable;

/// Action tables grouped by context id for a single error code.
///
/// A context corresponds to "how deep" in the structural hierarchy an
/// action applies. Contexts are only created when an action is registered,
/// so a reachable context is never empty by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextTable {
    contexts: BTreeMap<i32, ActionTable>,
}

impl ContextTable {
    /// Create an empty context table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table seeded with one context holding one action.
    pub fn with_action(context_id: i32, action: Action) -> Self {
        let mut table = Self::new();
        table.insert_action(context_id, action);
        table
    }

    /// Whether the given context id is registered.
    pub fn contains_context(&self, context_id: i32) -> bool {
        self.contexts.contains_key(&context_id)
    }

    /// Whether the given action id is registered under the given context.
    pub fn contains_action(&self, context_id: i32, action_id: i32) -> bool {
        self.contexts
            .get(&context_id)
            .is_some_and(|actions| actions.contains(action_id))
    }

    /// The globally highest-weight action across all contexts.
    ///
    /// Contexts are scanned in ascending id order with strictly-greater
    /// replacement, so among equal weights the lowest context id (then the
    /// lowest action id, via [`ActionTable::best_action_key`]) wins.
    /// Returns `None` only when no contexts are registered.
    pub fn optimal_action(&self) -> Option<&Action> {
        let mut best: Option<&Action> = None;
        for actions in self.contexts.values() {
            let Some(candidate) = actions.best_action() else {
                continue;
            };
            match best {
                Some(current) if candidate.compare_weight(current).is_le() => {}
                _ => best = Some(candidate),
            }
        }
        best
    }

    /// A uniformly random action from a uniformly random context.
    ///
    /// Returns the chosen context id alongside the action so the caller can
    /// report *where* exploration landed. `Err(context_id)` signals that the
    /// chosen context was empty; `Ok(None)`-style absence is impossible
    /// because the caller checks for registered contexts first.
    pub fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Action, Option<i32>> {
        if self.contexts.is_empty() {
            return Err(None);
        }
        let index = rng.gen_range(0..self.contexts.len());
        let Some((context_id, actions)) = self.contexts.iter().nth(index) else {
            return Err(None);
        };
        actions.random_action(rng).ok_or(Some(*context_id))
    }

    /// Insert or overwrite an action under the given context, creating the
    /// context on demand.
    pub fn insert_action(&mut self, context_id: i32, action: Action) {
        self.contexts
            .entry(context_id)
            .or_default()
            .insert(action);
    }

    /// The action table for the given context.
    pub fn context(&self, context_id: i32) -> Option<&ActionTable> {
        self.contexts.get(&context_id)
    }

    /// Mutable access to the action registered under `(context_id, action_id)`.
    pub fn action_mut(&mut self, context_id: i32, action_id: i32) -> Option<&mut Action> {
        self.contexts
            .get_mut(&context_id)
            .and_then(|actions| actions.action_mut(action_id))
    }

    /// The action registered under `(context_id, action_id)`.
    pub fn action(&self, context_id: i32, action_id: i32) -> Option<&Action> {
        self.contexts
            .get(&context_id)
            .and_then(|actions| actions.action(action_id))
    }

    /// Number of registered contexts.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Number of actions registered under the given context.
    pub fn action_count(&self, context_id: i32) -> usize {
        self.contexts
            .get(&context_id)
            .map_or(0, ActionTable::len)
    }

    /// Reset every action's weight to zero.
    pub fn clear_weights(&mut self) {
        for actions in self.contexts.values_mut() {
            actions.clear_weights();
        }
    }

    /// Apply warm-start bias to every action from its tag dictionary.
    pub fn influence_weights_from_preferences_by(&mut self, factor: f64, active_ids: &[i32]) {
        for actions in self.contexts.values_mut() {
            actions.influence_weights_from_preferences_by(factor, active_ids);
        }
    }

    /// Iterate `(context_id, action_table)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &ActionTable)> {
        self.contexts.iter().map(|(id, actions)| (*id, actions))
    }
}
