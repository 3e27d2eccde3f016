//! SimulationSession - one what-if conversation about one decision.
//!
//! The transcript only grows by whole turns. A reply is appended together
//! with the message that prompted it once the provider has answered, so a
//! turn abandoned mid-flight leaves no trace and a late reply has nowhere
//! to land.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::errors::EngineError;
use crate::domain::foundation::{
    DecisionId, DomainError, ErrorCode, SimulationId, StateMachine, UserId, ValidationError,
};
use crate::domain::simulation::{
    SimulationFraming, SimulationStatus, Transcript, TranscriptEntry, EMPTY_OPENING_FALLBACK,
    OPENING_TURN, SEND_FAILURE_MESSAGE, START_FAILURE_MESSAGE,
};
use crate::ports::{ChatHandle, ReasoningProvider};

pub struct SimulationSession {
    id: SimulationId,
    owner_id: UserId,
    framing: SimulationFraming,
    provider: Arc<dyn ReasoningProvider>,
    chat: Option<Box<dyn ChatHandle>>,
    transcript: Transcript,
    status: SimulationStatus,
}

impl SimulationSession {
    /// Opens the conversation and lets the assistant set the scene.
    ///
    /// Never fails. When the provider cannot be reached the session starts
    /// degraded with a synthetic opening entry.
    pub async fn start(
        provider: Arc<dyn ReasoningProvider>,
        owner_id: UserId,
        framing: SimulationFraming,
    ) -> Self {
        let mut session = Self {
            id: SimulationId::new(),
            owner_id,
            framing,
            provider,
            chat: None,
            transcript: Transcript::new(),
            status: SimulationStatus::Active,
        };

        match session.open_and_greet().await {
            Ok(opening) => session.transcript.open(opening, false),
            Err(err) => {
                warn!(
                    simulation_id = %session.id,
                    decision_id = %session.framing.decision_id,
                    error = %err,
                    "Simulation start failed"
                );
                session.transcript.open(START_FAILURE_MESSAGE, true);
                session.mark(SimulationStatus::Degraded);
            }
        }

        info!(
            simulation_id = %session.id,
            decision_id = %session.framing.decision_id,
            scenario = session.framing.scenario.as_deref().unwrap_or("generic"),
            status = %session.status,
            "Simulation started"
        );
        session
    }

    async fn open_and_greet(&mut self) -> Result<String, EngineError> {
        let mut chat = self.provider.open_chat(self.framing.clone()).await?;
        let result = chat.send(OPENING_TURN).await;
        // A handle that opened is kept even if the greeting failed.
        self.chat = Some(chat);

        let opening = result?;
        if opening.trim().is_empty() {
            Ok(EMPTY_OPENING_FALLBACK.to_string())
        } else {
            Ok(opening)
        }
    }

    /// Sends one user message and returns the assistant entry it produced.
    ///
    /// Provider failures do not surface as errors: the turn is recorded
    /// with a synthetic reply and the session becomes degraded, so the user
    /// can simply send again.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank message
    /// - `State` once the session has ended
    pub async fn send(&mut self, text: &str) -> Result<TranscriptEntry, EngineError> {
        if !self.status.accepts_input() {
            return Err(ended(self.id).into());
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }

        match self.exchange(text).await {
            Ok(reply) => {
                self.transcript.push_turn(text, reply, false);
                self.mark(SimulationStatus::Active);
                debug!(
                    simulation_id = %self.id,
                    entries = self.transcript.len(),
                    "Simulation turn completed"
                );
            }
            Err(err) => {
                warn!(
                    simulation_id = %self.id,
                    error = %err,
                    "Simulation turn failed"
                );
                self.transcript.push_turn(text, SEND_FAILURE_MESSAGE, true);
                self.mark(SimulationStatus::Degraded);
            }
        }

        match self.transcript.last() {
            Some(entry) => Ok(entry.clone()),
            None => Err(DomainError::new(ErrorCode::InternalError, "empty transcript").into()),
        }
    }

    async fn exchange(&mut self, text: &str) -> Result<String, EngineError> {
        if self.chat.is_none() {
            debug!(simulation_id = %self.id, "Re-opening simulation chat");
            self.chat = Some(self.provider.open_chat(self.framing.clone()).await?);
        }
        match self.chat.as_mut() {
            Some(chat) => Ok(chat.send(text).await?),
            None => Err(DomainError::new(ErrorCode::InternalError, "chat unavailable").into()),
        }
    }

    /// Discards the provider conversation. Later sends fail.
    ///
    /// # Errors
    ///
    /// - `State` if the session already ended
    pub fn end(&mut self) -> Result<&Transcript, EngineError> {
        self.status = self.status.transition_to(SimulationStatus::Ended)?;
        self.chat = None;
        info!(
            simulation_id = %self.id,
            entries = self.transcript.len(),
            "Simulation ended"
        );
        Ok(&self.transcript)
    }

    fn mark(&mut self, next: SimulationStatus) {
        if self.status.can_transition_to(&next) {
            self.status = next;
        }
    }

    pub fn id(&self) -> SimulationId {
        self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn decision_id(&self) -> DecisionId {
        self.framing.decision_id
    }

    pub fn scenario(&self) -> Option<&str> {
        self.framing.scenario.as_deref()
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }
}

pub(crate) fn ended(id: SimulationId) -> DomainError {
    DomainError::new(
        ErrorCode::SimulationEnded,
        format!("Simulation has ended: {}", id),
    )
    .with_detail("simulation_id", id.to_string())
}
