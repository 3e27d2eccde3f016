//! CogniClear - decision analysis and simulation engine
//!
//! Records decisions, has them analysed by an external reasoning provider,
//! runs what-if conversations anchored to a decision, and reconciles the
//! analysis against the real outcome once it is known.
//!
//! The crate follows a hexagonal layout: `domain` holds the decision
//! lifecycle and the analysis contract, `ports` the provider and storage
//! seams, `adapters` their implementations, and `application` the command
//! and query handlers. [`Engine`] wires them together.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod engine;
pub mod ports;

pub use application::EngineError;
pub use engine::{Engine, EngineBuildError};
