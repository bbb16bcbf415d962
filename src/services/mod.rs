//! Service layer: knowledge access, reward shaping, and repair coordination.

pub mod knowledge_service;
pub mod preferences;
pub mod repair_coordinator;
pub mod reward_calculator;

pub use knowledge_service::Knowledge;
pub use repair_coordinator::{RepairCoordinator, SelectionMode};
pub use reward_calculator::RewardCalculator;
