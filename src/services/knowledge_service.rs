//! The knowledge service: owns the table, its store, and the exploration RNG.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Action, QTable};
use crate::domain::ports::KnowledgeStore;

/// Durable learned knowledge plus the exploration random source.
///
/// The only entity with a lifecycle longer than a single repair attempt:
/// loaded once at process start, mutated throughout one or more sessions,
/// saved explicitly at checkpoints. One seedable RNG is injected at
/// construction so exploration decisions can be replayed in tests.
pub struct Knowledge {
    qtable: QTable,
    store: Arc<dyn KnowledgeStore>,
    rng: StdRng,
}

impl Knowledge {
    /// Create an empty knowledge base over the given store.
    ///
    /// `exploration_seed` fixes the RNG for deterministic replay; `None`
    /// seeds from entropy.
    pub fn new(store: Arc<dyn KnowledgeStore>, exploration_seed: Option<u64>) -> Self {
        let rng = match exploration_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            qtable: QTable::new(),
            store,
            rng,
        }
    }

    /// Load the persisted table, replacing the in-memory one.
    ///
    /// Returns `false` when no document exists yet, leaving the table
    /// empty -- the expected state for a fresh installation. A corrupt
    /// document fails the load without touching the in-memory table.
    pub async fn load(&mut self) -> DomainResult<bool> {
        match self.store.load().await? {
            Some(table) => {
                info!(error_codes = table.error_count(), "learned knowledge loaded");
                self.qtable = table;
                Ok(true)
            }
            None => {
                info!("no persisted knowledge found, starting empty");
                Ok(false)
            }
        }
    }

    /// Persist the current table.
    pub async fn save(&self) -> DomainResult<()> {
        self.store.save(&self.qtable).await
    }

    /// The learned table.
    pub fn qtable(&self) -> &QTable {
        &self.qtable
    }

    /// Mutable access to the learned table for the reward pipeline.
    pub fn qtable_mut(&mut self) -> &mut QTable {
        &mut self.qtable
    }

    /// Exploit: the best-known action for the error code, or `None` when
    /// nothing has been learned for it yet.
    pub fn optimal_action(&self, error_code: i32) -> Option<Action> {
        self.qtable.optimal_action(error_code).cloned()
    }

    /// Explore: a uniformly random action in a uniformly random context.
    ///
    /// Recoverable errors for an unknown code or an empty context let the
    /// driver fall back (skip exploration, try another error).
    pub fn random_action(&mut self, error_code: i32) -> DomainResult<Action> {
        let action = self.qtable.random_action(error_code, &mut self.rng)?;
        debug!(error_code, action_id = action.id, "explored random action");
        Ok(action.clone())
    }

    /// Register a candidate action reported by the collaborator, creating
    /// table levels on demand.
    pub fn insert_action(&mut self, error_code: i32, context_id: i32, action: Action) {
        self.qtable.insert_action(error_code, context_id, action);
    }
}
