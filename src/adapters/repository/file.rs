//! File-based Decision Repository
//!
//! Stores each owner's decisions as one YAML document on disk:
//! `<base>/<owner>/decisions.yaml`. Records written by older versions are
//! upgraded on first read and the document is rewritten once.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::in_memory::sort_newest_first;
use super::record::DecisionRecord;
use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, DecisionStatus, DomainError, ErrorCode, UserId};
use crate::ports::{decision_not_found, ensure_unchanged, DecisionRepository};

const DECISIONS_FILE: &str = "decisions.yaml";

#[derive(Debug, Default, Serialize, Deserialize)]
struct DecisionDocument {
    #[serde(default)]
    decisions: Vec<DecisionRecord>,
}

/// File-based storage for decisions
#[derive(Debug)]
pub struct FileDecisionRepository {
    base_path: PathBuf,
    /// Serializes read-modify-write cycles on the documents.
    write_lock: Mutex<()>,
}

impl FileDecisionRepository {
    /// Create a repository rooted at `base_path`.
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileDecisionRepository::new("./data/decisions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn owner_dir(&self, owner: &UserId) -> PathBuf {
        self.base_path.join(sanitize(owner.as_str()))
    }

    fn document_path(&self, owner: &UserId) -> PathBuf {
        self.owner_dir(owner).join(DECISIONS_FILE)
    }

    async fn load(&self, owner: &UserId) -> Result<Vec<Decision>, DomainError> {
        let path = self.document_path(owner);
        if !fs::try_exists(&path).await.map_err(io_error)? {
            return Ok(Vec::new());
        }

        let yaml = fs::read_to_string(&path).await.map_err(io_error)?;
        let document: DecisionDocument = serde_yaml::from_str(&yaml)
            .map_err(|e| storage_error(format!("corrupt document {}: {}", path.display(), e)))?;

        let upgraded = document
            .decisions
            .iter()
            .filter(|r| r.needs_upgrade())
            .count();
        let decisions: Vec<Decision> = document
            .decisions
            .into_iter()
            .map(DecisionRecord::into_decision)
            .collect();

        if upgraded > 0 {
            tracing::info!(
                owner = %owner,
                upgraded,
                "Upgraded legacy decision records"
            );
            self.store(owner, &decisions).await?;
        }

        Ok(decisions)
    }

    async fn store(&self, owner: &UserId, decisions: &[Decision]) -> Result<(), DomainError> {
        fs::create_dir_all(self.owner_dir(owner))
            .await
            .map_err(io_error)?;

        let document = DecisionDocument {
            decisions: decisions.iter().map(DecisionRecord::from_decision).collect(),
        };
        let yaml = serde_yaml::to_string(&document)
            .map_err(|e| storage_error(format!("serialization failed: {}", e)))?;

        // Write beside the target, then rename over it.
        let path = self.document_path(owner);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)
    }
}

fn sanitize(owner: &str) -> String {
    owner
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn storage_error(message: String) -> DomainError {
    DomainError::new(ErrorCode::StorageError, message)
}

fn io_error(e: std::io::Error) -> DomainError {
    storage_error(e.to_string())
}

#[async_trait]
impl DecisionRepository for FileDecisionRepository {
    async fn list(&self, owner: &UserId) -> Result<Vec<Decision>, DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut decisions = self.load(owner).await?;
        sort_newest_first(&mut decisions);
        Ok(decisions)
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &DecisionId,
    ) -> Result<Option<Decision>, DomainError> {
        let _guard = self.write_lock.lock().await;
        Ok(self.load(owner).await?.into_iter().find(|d| d.id() == id))
    }

    async fn create(&self, decision: &Decision) -> Result<Decision, DomainError> {
        let _guard = self.write_lock.lock().await;
        let owner = decision.owner_id();
        let mut decisions = self.load(owner).await?;
        decisions.insert(0, decision.clone());
        self.store(owner, &decisions).await?;

        tracing::debug!(decision_id = %decision.id(), "Decision written to disk");
        Ok(decision.clone())
    }

    async fn update(
        &self,
        decision: &Decision,
        expected: DecisionStatus,
    ) -> Result<Decision, DomainError> {
        let _guard = self.write_lock.lock().await;
        let owner = decision.owner_id();
        let mut decisions = self.load(owner).await?;
        let slot = decisions
            .iter_mut()
            .find(|d| d.id() == decision.id())
            .ok_or_else(|| decision_not_found(decision.id()))?;
        ensure_unchanged(slot, expected)?;
        *slot = decision.clone();
        self.store(owner, &decisions).await?;
        Ok(decision.clone())
    }

    async fn delete(&self, owner: &UserId, id: &DecisionId) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut decisions = self.load(owner).await?;
        let before = decisions.len();
        decisions.retain(|d| d.id() != id);
        if decisions.len() == before {
            return Err(decision_not_found(id));
        }
        self.store(owner, &decisions).await
    }
}
