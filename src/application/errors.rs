//! Engine error taxonomy.
//!
//! Every handler returns `EngineError`. Domain errors are routed by their
//! code so callers can branch on the category without inspecting codes.

use thiserror::Error;

use crate::domain::contract::ContractError;
use crate::domain::foundation::{DomainError, ErrorCode, SimulationId};
use crate::ports::ProviderError;

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Caller input violates a precondition. Never reaches the provider.
    #[error("validation failed: {0}")]
    Validation(DomainError),

    /// Provider reply failed schema validation.
    #[error("analysis contract violated: {0}")]
    AnalysisContract(#[from] ContractError),

    /// Network or provider failure.
    #[error("reasoning provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),

    /// Illegal lifecycle transition.
    #[error("invalid state: {0}")]
    State(DomainError),

    #[error("not found: {0}")]
    NotFound(DomainError),

    #[error("forbidden: {0}")]
    Forbidden(DomainError),

    /// Another turn on the same simulation is still pending.
    #[error("a turn is already in progress for simulation {0}")]
    TurnInProgress(SimulationId),

    #[error("storage failure: {0}")]
    Storage(DomainError),

    #[error("internal error: {0}")]
    Internal(DomainError),
}

impl EngineError {
    /// Stable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::AnalysisContract(_) => "ANALYSIS_CONTRACT_ERROR",
            EngineError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            EngineError::State(_) => "STATE_ERROR",
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::Forbidden(_) => "FORBIDDEN",
            EngineError::TurnInProgress(_) => "TURN_IN_PROGRESS",
            EngineError::Storage(_) => "STORAGE_ERROR",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The same request may succeed if sent again unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::AnalysisContract(_) | EngineError::TurnInProgress(_) => true,
            EngineError::ProviderUnavailable(err) => {
                err.is_retryable() || matches!(err, ProviderError::MalformedEnvelope(_))
            }
            _ => false,
        }
    }

    /// Message safe to show to an end user.
    pub fn to_client_message(&self) -> String {
        match self {
            EngineError::AnalysisContract(err) => err.to_client_message(),
            EngineError::ProviderUnavailable(_) => {
                "The analysis service is unavailable. Please try again.".to_string()
            }
            EngineError::Storage(_) | EngineError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            EngineError::Validation(err)
            | EngineError::State(err)
            | EngineError::NotFound(err)
            | EngineError::Forbidden(err) => err.message().to_string(),
            EngineError::TurnInProgress(_) => {
                "Wait for the current reply before sending another message.".to_string()
            }
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err.code {
            code if code.is_validation() => EngineError::Validation(err),
            code if code.is_state() => EngineError::State(err),
            ErrorCode::DecisionNotFound | ErrorCode::SimulationNotFound => {
                EngineError::NotFound(err)
            }
            ErrorCode::Forbidden => EngineError::Forbidden(err),
            ErrorCode::StorageError => EngineError::Storage(err),
            _ => EngineError::Internal(err),
        }
    }
}

impl From<crate::domain::foundation::ValidationError> for EngineError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        EngineError::Validation(err.into())
    }
}
