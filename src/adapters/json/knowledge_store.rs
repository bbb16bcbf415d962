//! JSON tree-document implementation of the `KnowledgeStore`.
//!
//! The document has a single root carrying a format version and save
//! timestamp; under it, one entry per error code; under each, one entry per
//! context id; under each, one entry per action id with the action's weight,
//! message, hierarchy levels, and tag dictionary. Loading rebuilds the
//! three-level map exactly and treats a missing action id or a duplicate
//! key at any level as corruption, aborting the whole load.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Action, QTable, TagDictionary};
use crate::domain::ports::KnowledgeStore;

/// Current persistence format version.
const DOCUMENT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Document shape
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct KnowledgeDocument {
    version: u32,
    saved_at: DateTime<Utc>,
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorEntry {
    code: i32,
    contexts: Vec<ContextEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContextEntry {
    id: i32,
    actions: Vec<ActionEntry>,
}

/// One persisted action. `id` has no serde default on purpose: an action
/// entry without an id is a corruption error, not a skippable row.
#[derive(Debug, Serialize, Deserialize)]
struct ActionEntry {
    id: i32,
    weight: f64,
    message: String,
    hierarchy: i32,
    sub_hierarchy: i32,
    #[serde(default)]
    tags: TagDictionary,
}

fn document_from_table(table: &QTable) -> KnowledgeDocument {
    let errors = table
        .iter()
        .map(|(code, contexts)| ErrorEntry {
            code,
            contexts: contexts
                .iter()
                .map(|(context_id, actions)| ContextEntry {
                    id: context_id,
                    actions: actions
                        .iter()
                        .map(|(_, action)| ActionEntry {
                            id: action.id,
                            weight: action.weight,
                            message: action.message.clone(),
                            hierarchy: action.hierarchy,
                            sub_hierarchy: action.sub_hierarchy,
                            tags: action.tags.clone(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    KnowledgeDocument {
        version: DOCUMENT_VERSION,
        saved_at: Utc::now(),
        errors,
    }
}

fn table_from_document(document: KnowledgeDocument) -> DomainResult<QTable> {
    if document.version != DOCUMENT_VERSION {
        return Err(DomainError::Corrupt(format!(
            "unsupported document version {} (expected {DOCUMENT_VERSION})",
            document.version
        )));
    }

    let mut table = QTable::new();
    for error_entry in document.errors {
        if table.contains_error_code(error_entry.code) {
            return Err(DomainError::Corrupt(format!(
                "duplicate error code {}",
                error_entry.code
            )));
        }
        for context_entry in error_entry.contexts {
            if table.contains_context(error_entry.code, context_entry.id) {
                return Err(DomainError::Corrupt(format!(
                    "duplicate context {} under error code {}",
                    context_entry.id, error_entry.code
                )));
            }
            for action_entry in context_entry.actions {
                if table.contains_action(error_entry.code, context_entry.id, action_entry.id) {
                    return Err(DomainError::Corrupt(format!(
                        "duplicate action {} under error code {}, context {}",
                        action_entry.id, error_entry.code, context_entry.id
                    )));
                }
                let mut action = Action::new(
                    action_entry.id,
                    action_entry.hierarchy,
                    action_entry.sub_hierarchy,
                    action_entry.message,
                );
                action.weight = action_entry.weight;
                action.tags = action_entry.tags;
                table.insert_action(error_entry.code, context_entry.id, action);
            }
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// File-backed knowledge store persisting the table as one JSON document.
#[derive(Debug, Clone)]
pub struct JsonKnowledgeStore {
    path: PathBuf,
}

impl JsonKnowledgeStore {
    /// Create a store backed by the given document path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path this store reads and writes.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl KnowledgeStore for JsonKnowledgeStore {
    async fn load(&self) -> DomainResult<Option<QTable>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let document: KnowledgeDocument = serde_json::from_slice(&bytes)?;
        let table = table_from_document(document)?;
        tracing::debug!(
            path = %self.path.display(),
            error_codes = table.error_count(),
            "knowledge document loaded"
        );
        Ok(Some(table))
    }

    async fn save(&self, table: &QTable) -> DomainResult<()> {
        let document = document_from_table(table);
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|err| DomainError::Storage(err.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write-then-rename so a crash mid-save never truncates the
        // previous document.
        let staging = self.path.with_extension("json.tmp");
        {
            let mut file = tokio::fs::File::create(&staging).await?;
            file.write_all(&bytes).await?;
            file.flush().await?;
            file.sync_all().await?;
        }
        tokio::fs::rename(&staging, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            error_codes = table.error_count(),
            "knowledge document saved"
        );
        Ok(())
    }
}
