//! Domain models for the mender knowledge engine.

pub mod action;
pub mod config;
pub mod diagnostic;
pub mod knowledge;
pub mod preference;
pub mod solution;

pub use action::{Action, TagDictionary};
pub use config::{Config, KnowledgeConfig, LoggingConfig, PreferenceWeights, PreferencesConfig};
pub use diagnostic::Diagnostic;
pub use knowledge::{ActionTable, ContextTable, QTable};
pub use preference::PreferenceOption;
pub use solution::{AppliedAction, Solution};
