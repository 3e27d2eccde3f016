//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Lifecycle-advancing commands fail loudly and leave stored decisions
//! untouched; pattern summaries and simulation turns degrade instead.

pub mod contract;
pub mod errors;
pub mod handlers;
pub mod simulation;

pub use contract::AnalysisContract;
pub use errors::EngineError;
pub use simulation::{SimulationRegistry, SimulationSession, SimulationSnapshot};
