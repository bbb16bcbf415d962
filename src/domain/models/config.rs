use serde::{Deserialize, Serialize};

use super::preference::PreferenceOption;

/// Main configuration structure for mender
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Knowledge base persistence and exploration settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Reward-shaping preference selection and weights
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Knowledge base configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KnowledgeConfig {
    /// Path to the persisted knowledge document
    #[serde(default = "default_knowledge_path")]
    pub path: String,

    /// Save the knowledge base after every rewarded solution (otherwise
    /// only on explicit checkpoints)
    #[serde(default = "default_save_after_reward")]
    pub save_after_reward: bool,

    /// Optional fixed seed for the exploration RNG; unset draws from
    /// entropy
    #[serde(default)]
    pub exploration_seed: Option<u64>,
}

fn default_knowledge_path() -> String {
    ".mender/knowledge.json".to_string()
}

const fn default_save_after_reward() -> bool {
    true
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
            save_after_reward: default_save_after_reward(),
            exploration_seed: None,
        }
    }
}

/// Preference selection and per-preference weights
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PreferencesConfig {
    /// Preferences active for this session, in registration order
    #[serde(default)]
    pub enabled: Vec<PreferenceOption>,

    /// Configured weight per preference
    #[serde(default)]
    pub weights: PreferenceWeights,
}

/// Configured weight per preference option.
///
/// These are tunables with no derived meaning; they scale each preference's
/// contribution to the per-step reward or the post-repair bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PreferenceWeights {
    /// Weight for `short_sequences_of_actions`
    #[serde(default = "default_sequence_weight")]
    pub short_sequences_of_actions: i64,

    /// Weight for `long_sequences_of_actions`
    #[serde(default = "default_sequence_weight")]
    pub long_sequences_of_actions: i64,

    /// Weight for `repair_high_in_context_hierarchy`
    #[serde(default = "default_hierarchy_weight")]
    pub repair_high_in_context_hierarchy: i64,

    /// Weight for `repair_low_in_context_hierarchy`
    #[serde(default = "default_hierarchy_weight")]
    pub repair_low_in_context_hierarchy: i64,

    /// Weight for `punish_deletion`
    #[serde(default = "default_deletion_weight")]
    pub punish_deletion: i64,

    /// Weight for `punish_modification_of_model`
    #[serde(default = "default_modification_weight")]
    pub punish_modification_of_model: i64,

    /// Weight for `reward_modification_of_model`
    #[serde(default = "default_modification_weight")]
    pub reward_modification_of_model: i64,
}

const fn default_sequence_weight() -> i64 {
    100
}

const fn default_hierarchy_weight() -> i64 {
    90
}

const fn default_deletion_weight() -> i64 {
    100
}

const fn default_modification_weight() -> i64 {
    50
}

impl Default for PreferenceWeights {
    fn default() -> Self {
        Self {
            short_sequences_of_actions: default_sequence_weight(),
            long_sequences_of_actions: default_sequence_weight(),
            repair_high_in_context_hierarchy: default_hierarchy_weight(),
            repair_low_in_context_hierarchy: default_hierarchy_weight(),
            punish_deletion: default_deletion_weight(),
            punish_modification_of_model: default_modification_weight(),
            reward_modification_of_model: default_modification_weight(),
        }
    }
}

impl PreferenceWeights {
    /// The configured weight for the given preference option.
    pub fn weight_for(&self, option: PreferenceOption) -> i64 {
        match option {
            PreferenceOption::ShortSequencesOfActions => self.short_sequences_of_actions,
            PreferenceOption::LongSequencesOfActions => self.long_sequences_of_actions,
            PreferenceOption::RepairHighInContextHierarchy => {
                self.repair_high_in_context_hierarchy
            }
            PreferenceOption::RepairLowInContextHierarchy => self.repair_low_in_context_hierarchy,
            PreferenceOption::PunishDeletion => self.punish_deletion,
            PreferenceOption::PunishModificationOfModel => self.punish_modification_of_model,
            PreferenceOption::RewardModificationOfModel => self.reward_modification_of_model,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for daily-rolling file output
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
