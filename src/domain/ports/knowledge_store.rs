//! Knowledge base persistence port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::QTable;

/// Storage interface for the knowledge table.
///
/// Abstracts the backing document store. Loading reconstructs the
/// three-level map exactly; a malformed document must fail the load rather
/// than produce a partially-built table.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Load the persisted table, or `None` when no document exists yet
    /// (a fresh installation starts empty).
    async fn load(&self) -> DomainResult<Option<QTable>>;

    /// Persist the table, replacing any previous document atomically.
    async fn save(&self, table: &QTable) -> DomainResult<()>;
}
