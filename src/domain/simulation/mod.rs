//! Simulation module - value types for what-if conversations.
//!
//! Sessions themselves live in the application layer because they hold a
//! provider handle; this module only defines what they record.

mod framing;
mod status;
mod transcript;

pub use framing::{
    SimulationFraming, EMPTY_OPENING_FALLBACK, OPENING_TURN, SEND_FAILURE_MESSAGE,
    START_FAILURE_MESSAGE,
};
pub use status::SimulationStatus;
pub use transcript::{Speaker, Transcript, TranscriptEntry};
