//! The root knowledge table: learned weights per error, context, and action.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::action::{Action, TagDictionary};

use super::context_table::ContextTable;

/// The persisted root of the knowledge base.
///
/// Maps error code -> context id -> action id -> [`Action`]. Every
/// reachable action is uniquely identified by that triple. Weights are
/// unbounded additive counters, not value estimates or probabilities.
///
/// The table is plain mutable state with no internal synchronization;
/// concurrent repair sessions need external mutual exclusion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable {
    errors: BTreeMap<i32, ContextTable>,
}

impl QTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any context is registered for the given error code.
    pub fn contains_error_code(&self, error_code: i32) -> bool {
        self.errors.contains_key(&error_code)
    }

    /// Whether the given context id is registered for the error code.
    pub fn contains_context(&self, error_code: i32, context_id: i32) -> bool {
        self.errors
            .get(&error_code)
            .is_some_and(|contexts| contexts.contains_context(context_id))
    }

    /// Whether the `(error_code, context_id, action_id)` triple is registered.
    pub fn contains_action(&self, error_code: i32, context_id: i32, action_id: i32) -> bool {
        self.errors
            .get(&error_code)
            .is_some_and(|contexts| contexts.contains_action(context_id, action_id))
    }

    /// The highest-weight action across all contexts registered for the
    /// error code.
    ///
    /// Ties resolve deterministically to the lowest context id, then the
    /// lowest action id. `None` when no contexts are registered for the
    /// code -- an expected condition early in training, not an error.
    pub fn optimal_action(&self, error_code: i32) -> Option<&Action> {
        self.errors
            .get(&error_code)
            .and_then(ContextTable::optimal_action)
    }

    /// A uniformly random action in a uniformly random context, for
    /// exploration.
    ///
    /// Fails with [`DomainError::UnknownErrorCode`] when nothing is
    /// registered for the code and [`DomainError::EmptyContext`] when the
    /// chosen context has no actions, so the driver can fall back instead
    /// of hitting an indexing fault.
    pub fn random_action<R: Rng + ?Sized>(
        &self,
        error_code: i32,
        rng: &mut R,
    ) -> DomainResult<&Action> {
        let contexts = self
            .errors
            .get(&error_code)
            .ok_or(DomainError::UnknownErrorCode(error_code))?;
        contexts.random_action(rng).map_err(|context_id| match context_id {
            Some(context_id) => DomainError::EmptyContext {
                error_code,
                context_id,
            },
            None => DomainError::UnknownErrorCode(error_code),
        })
    }

    /// Insert or overwrite an action, creating the error and context levels
    /// on demand.
    pub fn insert_action(&mut self, error_code: i32, context_id: i32, action: Action) {
        self.errors
            .entry(error_code)
            .or_default()
            .insert_action(context_id, action);
    }

    /// The action registered under the triple.
    pub fn action(&self, error_code: i32, context_id: i32, action_id: i32) -> Option<&Action> {
        self.errors
            .get(&error_code)
            .and_then(|contexts| contexts.action(context_id, action_id))
    }

    /// The learned weight for the triple.
    pub fn weight(&self, error_code: i32, context_id: i32, action_id: i32) -> DomainResult<f64> {
        self.action(error_code, context_id, action_id)
            .map(|action| action.weight)
            .ok_or(DomainError::ActionNotFound {
                error_code,
                context_id,
                action_id,
            })
    }

    /// Set the learned weight for the triple.
    pub fn set_weight(
        &mut self,
        error_code: i32,
        context_id: i32,
        action_id: i32,
        weight: f64,
    ) -> DomainResult<()> {
        let action = self.action_mut(error_code, context_id, action_id)?;
        action.weight = weight;
        Ok(())
    }

    /// The tag dictionary for the triple.
    pub fn tag_dictionary(
        &self,
        error_code: i32,
        context_id: i32,
        action_id: i32,
    ) -> DomainResult<&TagDictionary> {
        self.action(error_code, context_id, action_id)
            .map(|action| &action.tags)
            .ok_or(DomainError::ActionNotFound {
                error_code,
                context_id,
                action_id,
            })
    }

    /// Set the tag value for a preference on the triple, overwriting any
    /// previous value.
    pub fn set_tag_value(
        &mut self,
        error_code: i32,
        context_id: i32,
        action_id: i32,
        preference_id: i32,
        value: i64,
    ) -> DomainResult<()> {
        let action = self.action_mut(error_code, context_id, action_id)?;
        action.tags.set_value(preference_id, value);
        Ok(())
    }

    /// Add to the tag value for a preference on the triple, starting from
    /// zero when absent.
    pub fn add_tag_value(
        &mut self,
        error_code: i32,
        context_id: i32,
        action_id: i32,
        preference_id: i32,
        delta: i64,
    ) -> DomainResult<()> {
        let action = self.action_mut(error_code, context_id, action_id)?;
        action.tags.add_value(preference_id, delta);
        Ok(())
    }

    /// Reset every action's weight to zero, for full relearning.
    pub fn clear_weights(&mut self) {
        for contexts in self.errors.values_mut() {
            contexts.clear_weights();
        }
    }

    /// For every action, add `tag_value * factor` to its weight for every
    /// tag whose preference id is in `active_ids` (warm-start bias).
    pub fn influence_weights_from_preferences_by(&mut self, factor: f64, active_ids: &[i32]) {
        for contexts in self.errors.values_mut() {
            contexts.influence_weights_from_preferences_by(factor, active_ids);
        }
    }

    /// Number of registered error codes.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of contexts registered for the given error code.
    pub fn context_count(&self, error_code: i32) -> usize {
        self.errors
            .get(&error_code)
            .map_or(0, ContextTable::context_count)
    }

    /// Number of actions registered under `(error_code, context_id)`.
    pub fn action_count(&self, error_code: i32, context_id: i32) -> usize {
        self.errors
            .get(&error_code)
            .map_or(0, |contexts| contexts.action_count(context_id))
    }

    /// Iterate `(error_code, context_table)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &ContextTable)> {
        self.errors.iter().map(|(code, contexts)| (*code, contexts))
    }

    fn action_mut(
        &mut self,
        error_code: i32,
        context_id: i32,
        action_id: i32,
    ) -> DomainResult<&mut Action> {
        self.errors
            .get_mut(&error_code)
            .and_then(|contexts| contexts.action_mut(context_id, action_id))
            .ok_or(DomainError::ActionNotFound {
                error_code,
                context_id,
                action_id,
            })
    }
}
