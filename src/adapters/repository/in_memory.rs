//! In-memory decision repository.
//!
//! Useful for tests and for running without persistent storage.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, DecisionStatus, DomainError, UserId};
use crate::ports::{decision_not_found, ensure_unchanged, DecisionRepository};

/// Decisions kept per owner, newest first.
#[derive(Debug, Default)]
pub struct InMemoryDecisionRepository {
    decisions: RwLock<HashMap<UserId, Vec<Decision>>>,
}

impl InMemoryDecisionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored decisions across owners.
    pub async fn len(&self) -> usize {
        self.decisions.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub(crate) fn sort_newest_first(decisions: &mut [Decision]) {
    decisions.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

#[async_trait]
impl DecisionRepository for InMemoryDecisionRepository {
    async fn list(&self, owner: &UserId) -> Result<Vec<Decision>, DomainError> {
        let mut list = self
            .decisions
            .read()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_default();
        sort_newest_first(&mut list);
        Ok(list)
    }

    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &DecisionId,
    ) -> Result<Option<Decision>, DomainError> {
        Ok(self
            .decisions
            .read()
            .await
            .get(owner)
            .and_then(|list| list.iter().find(|d| d.id() == id).cloned()))
    }

    async fn create(&self, decision: &Decision) -> Result<Decision, DomainError> {
        self.decisions
            .write()
            .await
            .entry(decision.owner_id().clone())
            .or_default()
            .insert(0, decision.clone());
        Ok(decision.clone())
    }

    async fn update(
        &self,
        decision: &Decision,
        expected: DecisionStatus,
    ) -> Result<Decision, DomainError> {
        let mut guard = self.decisions.write().await;
        let slot = guard
            .get_mut(decision.owner_id())
            .and_then(|list| list.iter_mut().find(|d| d.id() == decision.id()))
            .ok_or_else(|| decision_not_found(decision.id()))?;
        ensure_unchanged(slot, expected)?;
        *slot = decision.clone();
        Ok(decision.clone())
    }

    async fn delete(&self, owner: &UserId, id: &DecisionId) -> Result<(), DomainError> {
        let mut guard = self.decisions.write().await;
        let list = guard.get_mut(owner).ok_or_else(|| decision_not_found(id))?;
        let before = list.len();
        list.retain(|d| d.id() != id);
        if list.len() == before {
            return Err(decision_not_found(id));
        }
        Ok(())
    }
}
