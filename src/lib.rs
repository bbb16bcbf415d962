//! Mender - Reinforcement Knowledge Base for Automated Model Repair
//!
//! Mender learns, over repeated repair attempts, which corrective action
//! best resolves a given structural error in a modeled artifact. The crate
//! provides the learning core only: the hierarchical weighted decision
//! table (error code -> context -> action), the pluggable preference system
//! scoring actions and whole repair trajectories, and the persistence
//! format that makes learned weights durable across runs. Error extraction
//! and action execution belong to the surrounding tool, which drives this
//! engine through the [`RepairCoordinator`].
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture
//! principles:
//!
//! - **Domain Layer** (`domain`): Pure models and port traits
//! - **Service Layer** (`services`): Knowledge access, reward shaping,
//!   repair coordination
//! - **Adapters** (`adapters`): Tree-document persistence
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mender::adapters::JsonKnowledgeStore;
//! use mender::services::{Knowledge, RepairCoordinator, RewardCalculator, SelectionMode};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(JsonKnowledgeStore::new(".mender/knowledge.json"));
//!     let mut knowledge = Knowledge::new(store, None);
//!     knowledge.load().await?;
//!     // build a RewardCalculator from configured preferences, then drive
//!     // repair attempts through a RepairCoordinator
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::JsonKnowledgeStore;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Action, AppliedAction, Config, Diagnostic, KnowledgeConfig, LoggingConfig, PreferenceOption,
    PreferenceWeights, PreferencesConfig, QTable, Solution, TagDictionary,
};
pub use domain::ports::{KnowledgeStore, RepairableModel};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Knowledge, RepairCoordinator, RewardCalculator, SelectionMode};
