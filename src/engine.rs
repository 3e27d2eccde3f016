//! Composition root.
//!
//! `Engine` owns the shared ports and the live simulation registry, and
//! hands out handlers built on demand from them.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::adapters::ai::{GeminiProvider, MockReasoningProvider};
use crate::adapters::repository::{FileDecisionRepository, InMemoryDecisionRepository};
use crate::application::handlers::{
    AnalyzeDecisionHandler, DeleteDecisionHandler, EndSimulationHandler, GeneratePatternsHandler,
    GetDecisionHandler, GetDecisionStatsHandler, ListDecisionsHandler, RecordOutcomeHandler,
    SendSimulationMessageHandler, StartSimulationHandler, SubmitDecisionHandler,
};
use crate::application::{AnalysisContract, SimulationRegistry};
use crate::config::{AiProvider, AppConfig, StorageBackend, ValidationError};
use crate::ports::{DecisionRepository, ProviderError, ReasoningProvider};

/// Errors raised while assembling an engine from configuration.
#[derive(Debug, Error)]
pub enum EngineBuildError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("reasoning provider could not be created: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Clone)]
pub struct Engine {
    provider: Arc<dyn ReasoningProvider>,
    repository: Arc<dyn DecisionRepository>,
    contract: AnalysisContract,
    simulations: Arc<SimulationRegistry>,
}

impl Engine {
    pub fn new(
        provider: Arc<dyn ReasoningProvider>,
        repository: Arc<dyn DecisionRepository>,
    ) -> Self {
        Self {
            contract: AnalysisContract::new(provider.clone()),
            simulations: Arc::new(SimulationRegistry::new(provider.clone())),
            provider,
            repository,
        }
    }

    /// Builds the configured provider and repository.
    ///
    /// The mock provider starts with an empty script, so it is only useful
    /// for wiring checks and local runs.
    ///
    /// # Errors
    ///
    /// - `Config` when the configuration does not validate
    /// - `Provider` when the HTTP client cannot be built
    pub fn from_config(config: &AppConfig) -> Result<Self, EngineBuildError> {
        config.validate()?;

        let provider: Arc<dyn ReasoningProvider> = match config.ai.provider {
            AiProvider::Gemini => {
                let gemini = config
                    .ai
                    .gemini()
                    .ok_or(ValidationError::MissingRequired("GEMINI_API_KEY"))?;
                Arc::new(GeminiProvider::new(gemini)?)
            }
            AiProvider::Mock => Arc::new(MockReasoningProvider::new()),
        };

        let repository: Arc<dyn DecisionRepository> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryDecisionRepository::new()),
            StorageBackend::File => Arc::new(FileDecisionRepository::new(&config.storage.data_dir)),
        };

        let info = provider.provider_info();
        info!(
            provider = %info.name,
            model = %info.model,
            storage = ?config.storage.backend,
            "Engine assembled"
        );
        Ok(Self::new(provider, repository))
    }

    pub fn provider(&self) -> &Arc<dyn ReasoningProvider> {
        &self.provider
    }

    pub fn repository(&self) -> &Arc<dyn DecisionRepository> {
        &self.repository
    }

    pub fn simulations(&self) -> &Arc<SimulationRegistry> {
        &self.simulations
    }

    // Decision lifecycle

    pub fn submit_decision_handler(&self) -> SubmitDecisionHandler {
        SubmitDecisionHandler::new(self.repository.clone())
    }

    pub fn analyze_decision_handler(&self) -> AnalyzeDecisionHandler {
        AnalyzeDecisionHandler::new(self.repository.clone(), self.contract.clone())
    }

    pub fn record_outcome_handler(&self) -> RecordOutcomeHandler {
        RecordOutcomeHandler::new(self.repository.clone(), self.contract.clone())
    }

    pub fn list_decisions_handler(&self) -> ListDecisionsHandler {
        ListDecisionsHandler::new(self.repository.clone())
    }

    pub fn get_decision_handler(&self) -> GetDecisionHandler {
        GetDecisionHandler::new(self.repository.clone())
    }

    pub fn delete_decision_handler(&self) -> DeleteDecisionHandler {
        DeleteDecisionHandler::new(self.repository.clone())
    }

    // Patterns

    pub fn generate_patterns_handler(&self) -> GeneratePatternsHandler {
        GeneratePatternsHandler::new(self.repository.clone(), self.contract.clone())
    }

    pub fn decision_stats_handler(&self) -> GetDecisionStatsHandler {
        GetDecisionStatsHandler::new(self.repository.clone())
    }

    // Simulation

    pub fn start_simulation_handler(&self) -> StartSimulationHandler {
        StartSimulationHandler::new(self.repository.clone(), self.simulations.clone())
    }

    pub fn send_simulation_message_handler(&self) -> SendSimulationMessageHandler {
        SendSimulationMessageHandler::new(self.simulations.clone())
    }

    pub fn end_simulation_handler(&self) -> EndSimulationHandler {
        EndSimulationHandler::new(self.simulations.clone())
    }

    /// Closes every live simulation.
    pub async fn shutdown(&self) -> usize {
        self.simulations.end_all().await
    }
}
