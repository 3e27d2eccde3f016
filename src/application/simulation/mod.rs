//! Simulation sessions and the registry that keeps them alive.

mod registry;
mod session;

pub use registry::{SimulationRegistry, SimulationSnapshot, ENDED_SESSION_LIMIT};
pub use session::SimulationSession;
