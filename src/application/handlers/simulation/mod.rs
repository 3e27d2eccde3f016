//! Simulation command handlers.

mod end_simulation;
mod send_simulation_message;
mod start_simulation;

pub use end_simulation::{EndSimulationCommand, EndSimulationHandler};
pub use send_simulation_message::{SendSimulationMessageCommand, SendSimulationMessageHandler};
pub use start_simulation::{StartSimulationCommand, StartSimulationHandler};
