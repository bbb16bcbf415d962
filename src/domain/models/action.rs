//! Corrective actions and their per-preference tag dictionaries.
//!
//! An [`Action`] is a scored, taggable unit of corrective behavior. The
//! knowledge table ranks actions by weight; the [`TagDictionary`] records
//! which preference contributed what to that weight, both as an audit trail
//! and as the basis for warm-starting a table from prior learning.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TagDictionary
// ---------------------------------------------------------------------------

/// Per-action map from preference id to accumulated influence value.
///
/// Keys are the stable ids of
/// [`PreferenceOption`](crate::domain::models::preference::PreferenceOption).
/// Values accumulate over a run and are persisted alongside the action so a
/// future session can rebuild weight bias from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagDictionary {
    entries: BTreeMap<i32, i64>,
}

impl TagDictionary {
    /// Create an empty tag dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an influence value is recorded for the given preference id.
    pub fn contains(&self, preference_id: i32) -> bool {
        self.entries.contains_key(&preference_id)
    }

    /// The influence value recorded for the given preference id, if any.
    pub fn value(&self, preference_id: i32) -> Option<i64> {
        self.entries.get(&preference_id).copied()
    }

    /// Set the influence value for the given preference id, overwriting any
    /// previous value.
    pub fn set_value(&mut self, preference_id: i32, value: i64) {
        self.entries.insert(preference_id, value);
    }

    /// Add to the influence value for the given preference id, starting from
    /// zero when absent.
    pub fn add_value(&mut self, preference_id: i32, delta: i64) {
        *self.entries.entry(preference_id).or_insert(0) += delta;
    }

    /// Iterate over `(preference_id, value)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i64)> + '_ {
        self.entries.iter().map(|(id, value)| (*id, *value))
    }

    /// Number of recorded preference entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no influence values are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(i32, i64)> for TagDictionary {
    fn from_iter<I: IntoIterator<Item = (i32, i64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A candidate corrective operation, scored and tagged.
///
/// Identity is `id` within the enclosing action table; `hierarchy` and
/// `sub_hierarchy` locate the action in the structural hierarchy of the
/// model under repair. `weight` and `tags` mutate as learning proceeds,
/// everything else is fixed when the collaborator first reports the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Identifier within the enclosing action table.
    pub id: i32,

    /// Hierarchy level the action applies at (1 = top of the structure).
    pub hierarchy: i32,

    /// Sub-level within the hierarchy level.
    pub sub_hierarchy: i32,

    /// Learned weight. Unbounded, may be negative; not a probability.
    pub weight: f64,

    /// Human-readable description supplied by the collaborator.
    pub message: String,

    /// Per-preference influence bookkeeping.
    #[serde(default)]
    pub tags: TagDictionary,
}

impl Action {
    /// Create a new unweighted action.
    pub fn new(id: i32, hierarchy: i32, sub_hierarchy: i32, message: impl Into<String>) -> Self {
        Self {
            id,
            hierarchy,
            sub_hierarchy,
            weight: 0.0,
            message: message.into(),
            tags: TagDictionary::new(),
        }
    }

    /// Total order on weight for selection purposes. Ties are left to the
    /// enclosing table's deterministic key order.
    pub fn compare_weight(&self, other: &Action) -> Ordering {
        self.weight.total_cmp(&other.weight)
    }

    /// Whether this action removes elements from the model, judged from the
    /// collaborator-supplied descriptor.
    pub fn is_deletion(&self) -> bool {
        let message = self.message.to_lowercase();
        message.contains("delete") || message.contains("remove")
    }

    /// Add the tag values of every preference in `active_ids`, scaled by
    /// `factor`, to this action's weight.
    ///
    /// Warm-start bias: lets configured preferences pre-bias the table from
    /// a previous run's tag dictionaries before live learning resumes.
    pub fn influence_weight_from_preferences_by(&mut self, factor: f64, active_ids: &[i32]) {
        let bias: f64 = self
            .tags
            .iter()
            .filter(|(preference_id, _)| active_ids.contains(preference_id))
            .map(|(_, value)| value as f64 * factor)
            .sum();
        self.weight += bias;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged_action(tags: &[(i32, i64)]) -> Action {
        let mut action = Action::new(1, 1, 0, "set missing feature");
        for (id, value) in tags {
            action.tags.set_value(*id, *value);
        }
        action
    }

    #[test]
    fn test_compare_weight_orders_by_weight() {
        let mut low = Action::new(1, 1, 0, "a");
        let mut high = Action::new(2, 1, 0, "b");
        low.weight = -10.0;
        high.weight = 3.5;

        assert_eq!(low.compare_weight(&high), Ordering::Less);
        assert_eq!(high.compare_weight(&low), Ordering::Greater);
        assert_eq!(low.compare_weight(&low.clone()), Ordering::Equal);
    }

    #[test]
    fn test_is_deletion_matches_descriptor() {
        assert!(Action::new(1, 1, 0, "Delete dangling reference").is_deletion());
        assert!(Action::new(2, 1, 0, "remove unused classifier").is_deletion());
        assert!(!Action::new(3, 1, 0, "rename element").is_deletion());
    }

    #[test]
    fn test_influence_only_applies_active_preferences() {
        let mut action = tagged_action(&[(0, 100), (4, -50)]);
        action.weight = 10.0;

        action.influence_weight_from_preferences_by(0.5, &[0]);

        // 10 + 100 * 0.5; the tag for preference 4 is not active.
        assert!((action.weight - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tag_add_accumulates_from_zero() {
        let mut tags = TagDictionary::new();
        tags.add_value(0, 500);
        tags.add_value(0, 500);
        assert_eq!(tags.value(0), Some(1000));
        assert!(tags.contains(0));
        assert!(!tags.contains(1));
    }
}
