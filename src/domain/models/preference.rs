//! The closed set of reward-shaping preferences.

use serde::{Deserialize, Serialize};

/// A configurable reward-shaping strategy the engine knows how to build.
///
/// Preferences fall into two families:
/// - **Per-step** preferences score a single (diagnostic, action) decision:
///   `RepairHighInContextHierarchy`, `RepairLowInContextHierarchy`,
///   `PunishDeletion`, `PunishModificationOfModel`,
///   `RewardModificationOfModel`.
/// - **Post-repair** preferences compare completed trajectories against
///   each other: `ShortSequencesOfActions`, `LongSequencesOfActions`.
///
/// The discriminant doubles as the tag-dictionary key under which the
/// preference records its influence, so the values are part of the
/// persistence contract and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceOption {
    /// Prefer solutions that fix the model in fewer steps.
    ShortSequencesOfActions,

    /// Prefer solutions that take more steps (exploratory repairs).
    LongSequencesOfActions,

    /// Reward actions applied high in the context hierarchy.
    RepairHighInContextHierarchy,

    /// Reward actions applied low in the context hierarchy.
    RepairLowInContextHierarchy,

    /// Punish actions that delete model elements.
    PunishDeletion,

    /// Punish actions that modify the original model.
    PunishModificationOfModel,

    /// Reward actions that modify the original model.
    RewardModificationOfModel,
}

impl PreferenceOption {
    /// All supported options, in declaration (id) order.
    pub const ALL: [PreferenceOption; 7] = [
        PreferenceOption::ShortSequencesOfActions,
        PreferenceOption::LongSequencesOfActions,
        PreferenceOption::RepairHighInContextHierarchy,
        PreferenceOption::RepairLowInContextHierarchy,
        PreferenceOption::PunishDeletion,
        PreferenceOption::PunishModificationOfModel,
        PreferenceOption::RewardModificationOfModel,
    ];

    /// Stable integer id, used as the tag-dictionary key.
    pub fn id(self) -> i32 {
        match self {
            PreferenceOption::ShortSequencesOfActions => 0,
            PreferenceOption::LongSequencesOfActions => 1,
            PreferenceOption::RepairHighInContextHierarchy => 2,
            PreferenceOption::RepairLowInContextHierarchy => 3,
            PreferenceOption::PunishDeletion => 4,
            PreferenceOption::PunishModificationOfModel => 5,
            PreferenceOption::RewardModificationOfModel => 6,
        }
    }

    /// Stable snake_case name, matching the serde representation used in
    /// configuration files.
    pub fn name(self) -> &'static str {
        match self {
            PreferenceOption::ShortSequencesOfActions => "short_sequences_of_actions",
            PreferenceOption::LongSequencesOfActions => "long_sequences_of_actions",
            PreferenceOption::RepairHighInContextHierarchy => "repair_high_in_context_hierarchy",
            PreferenceOption::RepairLowInContextHierarchy => "repair_low_in_context_hierarchy",
            PreferenceOption::PunishDeletion => "punish_deletion",
            PreferenceOption::PunishModificationOfModel => "punish_modification_of_model",
            PreferenceOption::RewardModificationOfModel => "reward_modification_of_model",
        }
    }
}

impl std::fmt::Display for PreferenceOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable_and_unique() {
        let ids: Vec<i32> = PreferenceOption::ALL.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_serde_round_trip_uses_snake_case() {
        let json = serde_json::to_string(&PreferenceOption::PunishDeletion).unwrap();
        assert_eq!(json, "\"punish_deletion\"");
        let back: PreferenceOption = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PreferenceOption::PunishDeletion);
    }

    #[test]
    fn test_unknown_preference_name_is_rejected() {
        let result: Result<PreferenceOption, _> = serde_json::from_str("\"prefer_chaos\"");
        assert!(result.is_err());
    }
}
