//! Decision repository port.
//!
//! Defines the contract for persisting and retrieving Decision aggregates.
//! The engine only ever hands over and receives whole decisions; it never
//! holds a lock on the collection between calls.
//!
//! # Design
//!
//! - **Owner-scoped**: every read names the owner; another owner's
//!   decision is indistinguishable from a missing one
//! - **Whole-value writes**: `update` replaces the stored decision with
//!   the next state produced by the lifecycle
//! - **Conditional writes**: `update` names the status the caller loaded;
//!   if another writer advanced the stored decision in the meantime the
//!   write is refused, so each lifecycle step lands at most once

use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, DecisionStatus, DomainError, ErrorCode, UserId};
use async_trait::async_trait;

/// Repository port for Decision aggregate persistence.
#[async_trait]
pub trait DecisionRepository: Send + Sync {
    /// List an owner's decisions, newest first.
    async fn list(&self, owner: &UserId) -> Result<Vec<Decision>, DomainError>;

    /// Find one of the owner's decisions.
    ///
    /// Returns `None` if not found or owned by someone else.
    async fn find_by_id(
        &self,
        owner: &UserId,
        id: &DecisionId,
    ) -> Result<Option<Decision>, DomainError>;

    /// Store a new decision and return it as stored.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn create(&self, decision: &Decision) -> Result<Decision, DomainError>;

    /// Replace an existing decision whose stored status is still `expected`.
    ///
    /// # Errors
    ///
    /// - `DecisionNotFound` if the owner has no decision with this id
    /// - `InvalidStateTransition` if the stored status is no longer `expected`
    /// - `StorageError` on persistence failure
    async fn update(
        &self,
        decision: &Decision,
        expected: DecisionStatus,
    ) -> Result<Decision, DomainError>;

    /// Delete a decision.
    ///
    /// # Errors
    ///
    /// - `DecisionNotFound` if the owner has no decision with this id
    /// - `StorageError` on persistence failure
    async fn delete(&self, owner: &UserId, id: &DecisionId) -> Result<(), DomainError>;
}

/// Error for an id the owner does not hold.
pub fn decision_not_found(id: &DecisionId) -> DomainError {
    DomainError::new(
        ErrorCode::DecisionNotFound,
        format!("Decision not found: {}", id),
    )
    .with_detail("decision_id", id.to_string())
}

/// Checks the stored copy before a conditional write.
pub fn ensure_unchanged(
    stored: &Decision,
    expected: DecisionStatus,
) -> Result<(), DomainError> {
    if stored.status() == expected {
        return Ok(());
    }
    Err(DomainError::new(
        ErrorCode::InvalidStateTransition,
        format!(
            "Decision {} is {}, expected {}",
            stored.id(),
            stored.status(),
            expected
        ),
    )
    .with_detail("decision_id", stored.id().to_string())
    .with_detail("expected", expected.to_string())
    .with_detail("found", stored.status().to_string()))
}
