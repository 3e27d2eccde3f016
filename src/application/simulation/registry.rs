//! SimulationRegistry - live simulation sessions keyed by id.
//!
//! Each session sits behind its own `tokio::sync::Mutex`, so turns on one
//! session are serialized while different sessions proceed independently.
//! The map lock is only held long enough to look a session up.
//!
//! Snapshots read the state published after the last settled turn, so they
//! never wait on a turn in flight. Ended ids are remembered up to a fixed
//! limit; past it the oldest are forgotten and report as not found.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use super::session::{ended, SimulationSession};
use crate::application::errors::EngineError;
use crate::domain::foundation::{DecisionId, DomainError, ErrorCode, SimulationId, UserId};
use crate::domain::simulation::{SimulationFraming, SimulationStatus, Transcript, TranscriptEntry};
use crate::ports::ReasoningProvider;

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSnapshot {
    pub id: SimulationId,
    pub decision_id: DecisionId,
    pub scenario: Option<String>,
    pub status: SimulationStatus,
    pub transcript: Transcript,
}

impl SimulationSnapshot {
    fn of(session: &SimulationSession) -> Self {
        Self {
            id: session.id(),
            decision_id: session.decision_id(),
            scenario: session.scenario().map(str::to_string),
            status: session.status(),
            transcript: session.transcript().clone(),
        }
    }
}

/// How many ended sessions are remembered by default.
pub const ENDED_SESSION_LIMIT: usize = 1024;

#[derive(Clone)]
struct Slot {
    owner_id: UserId,
    session: Arc<Mutex<SimulationSession>>,
    /// State as of the last settled turn.
    settled: Arc<RwLock<SimulationSnapshot>>,
}

/// Owners of ended sessions, oldest evicted first once full.
struct Tombstones {
    owners: HashMap<SimulationId, UserId>,
    order: VecDeque<SimulationId>,
    limit: usize,
}

impl Tombstones {
    fn new(limit: usize) -> Self {
        Self {
            owners: HashMap::new(),
            order: VecDeque::new(),
            limit,
        }
    }

    fn insert(&mut self, id: SimulationId, owner: UserId) {
        if self.owners.insert(id, owner).is_none() {
            self.order.push_back(id);
        }
        while self.order.len() > self.limit {
            if let Some(oldest) = self.order.pop_front() {
                self.owners.remove(&oldest);
            }
        }
    }

    fn owner(&self, id: &SimulationId) -> Option<&UserId> {
        self.owners.get(id)
    }

    fn len(&self) -> usize {
        self.owners.len()
    }
}

pub struct SimulationRegistry {
    provider: Arc<dyn ReasoningProvider>,
    live: RwLock<HashMap<SimulationId, Slot>>,
    /// Sessions that have ended, so late sends fail as ended.
    ended: RwLock<Tombstones>,
}

impl SimulationRegistry {
    pub fn new(provider: Arc<dyn ReasoningProvider>) -> Self {
        Self::with_ended_limit(provider, ENDED_SESSION_LIMIT)
    }

    /// Registry remembering at most `limit` ended sessions.
    pub fn with_ended_limit(provider: Arc<dyn ReasoningProvider>, limit: usize) -> Self {
        Self {
            provider,
            live: RwLock::new(HashMap::new()),
            ended: RwLock::new(Tombstones::new(limit)),
        }
    }

    /// Starts a session and registers it under a fresh id.
    pub async fn start(&self, owner: &UserId, framing: SimulationFraming) -> SimulationSnapshot {
        let session =
            SimulationSession::start(self.provider.clone(), owner.clone(), framing).await;
        let snapshot = SimulationSnapshot::of(&session);

        self.live.write().await.insert(
            session.id(),
            Slot {
                owner_id: owner.clone(),
                session: Arc::new(Mutex::new(session)),
                settled: Arc::new(RwLock::new(snapshot.clone())),
            },
        );
        snapshot
    }

    /// Sends one message to a live session.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown id or one owned by someone else
    /// - `State` when the session has ended
    /// - `TurnInProgress` while another turn on the same session is pending
    /// - `Validation` for a blank message
    pub async fn send(
        &self,
        owner: &UserId,
        id: &SimulationId,
        text: &str,
    ) -> Result<TranscriptEntry, EngineError> {
        let slot = self.lookup(owner, id).await?;
        let mut guard = slot
            .session
            .try_lock()
            .map_err(|_| EngineError::TurnInProgress(*id))?;
        let entry = guard.send(text).await?;
        *slot.settled.write().await = SimulationSnapshot::of(&guard);
        Ok(entry)
    }

    /// State of a session as of its last settled turn.
    ///
    /// A turn still in flight is not visible; the call does not wait for it.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown id or one owned by someone else
    /// - `State` when the session has ended
    pub async fn snapshot(
        &self,
        owner: &UserId,
        id: &SimulationId,
    ) -> Result<SimulationSnapshot, EngineError> {
        let slot = self.lookup(owner, id).await?;
        let snapshot = slot.settled.read().await.clone();
        Ok(snapshot)
    }

    /// Ends a session, removing it and returning the final transcript.
    ///
    /// Waits for a pending turn on the same session to finish first.
    pub async fn end(&self, owner: &UserId, id: &SimulationId) -> Result<Transcript, EngineError> {
        let slot = {
            let mut live = self.live.write().await;
            let owned = live.get(id).map_or(false, |slot| &slot.owner_id == owner);
            if owned {
                live.remove(id)
            } else {
                None
            }
        };
        let Some(slot) = slot else {
            return Err(self.missing(owner, id).await);
        };

        self.ended.write().await.insert(*id, slot.owner_id);
        let mut session = slot.session.lock().await;
        let transcript = session.end()?.clone();
        Ok(transcript)
    }

    /// Ends every live session, waiting for in-flight turns to settle.
    ///
    /// Returns how many sessions were closed.
    pub async fn end_all(&self) -> usize {
        let slots: Vec<(SimulationId, Slot)> = self.live.write().await.drain().collect();
        if slots.is_empty() {
            return 0;
        }

        let mut tombstones = self.ended.write().await;
        for (id, slot) in &slots {
            tombstones.insert(*id, slot.owner_id.clone());
        }
        drop(tombstones);

        let closed = join_all(slots.iter().map(|(_, slot)| async move {
            let mut session = slot.session.lock().await;
            session.end().is_ok()
        }))
        .await
        .into_iter()
        .filter(|closed| *closed)
        .count();

        info!(sessions = closed, "Simulation sessions closed");
        closed
    }

    /// Number of live sessions.
    pub async fn live_count(&self) -> usize {
        self.live.read().await.len()
    }

    /// Number of ended sessions still remembered.
    pub async fn ended_count(&self) -> usize {
        self.ended.read().await.len()
    }

    async fn lookup(&self, owner: &UserId, id: &SimulationId) -> Result<Slot, EngineError> {
        if let Some(slot) = self.live.read().await.get(id) {
            if &slot.owner_id == owner {
                return Ok(slot.clone());
            }
        }
        Err(self.missing(owner, id).await)
    }

    async fn missing(&self, owner: &UserId, id: &SimulationId) -> EngineError {
        if self.ended.read().await.owner(id) == Some(owner) {
            return ended(*id).into();
        }
        DomainError::new(
            ErrorCode::SimulationNotFound,
            format!("Simulation not found: {}", id),
        )
        .with_detail("simulation_id", id.to_string())
        .into()
    }
}
