//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod decision;
pub mod patterns;
pub mod simulation;

pub use decision::{
    AnalyzeDecisionCommand, AnalyzeDecisionHandler, DeleteDecisionCommand, DeleteDecisionHandler,
    GetDecisionHandler, GetDecisionQuery, ListDecisionsHandler, ListDecisionsQuery,
    RecordOutcomeCommand, RecordOutcomeHandler, RecordOutcomeResult, SubmitDecisionCommand,
    SubmitDecisionHandler,
};
pub use patterns::{
    GeneratePatternsHandler, GeneratePatternsQuery, GetDecisionStatsHandler,
    GetDecisionStatsQuery,
};
pub use simulation::{
    EndSimulationCommand, EndSimulationHandler, SendSimulationMessageCommand,
    SendSimulationMessageHandler, StartSimulationCommand, StartSimulationHandler,
};
