//! Decision command and query handlers.

mod analyze_decision;
mod delete_decision;
mod list_decisions;
mod record_outcome;
mod submit_decision;

pub use analyze_decision::{AnalyzeDecisionCommand, AnalyzeDecisionHandler};
pub use delete_decision::{DeleteDecisionCommand, DeleteDecisionHandler};
pub use list_decisions::{
    GetDecisionHandler, GetDecisionQuery, ListDecisionsHandler, ListDecisionsQuery,
};
pub use record_outcome::{RecordOutcomeCommand, RecordOutcomeHandler, RecordOutcomeResult};
pub use submit_decision::{SubmitDecisionCommand, SubmitDecisionHandler};

use crate::application::errors::EngineError;
use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, UserId};
use crate::ports::{decision_not_found, DecisionRepository};

/// Loads one of the owner's decisions or fails with `NotFound`.
pub(crate) async fn load_owned(
    repository: &dyn DecisionRepository,
    owner: &UserId,
    id: &DecisionId,
) -> Result<Decision, EngineError> {
    repository
        .find_by_id(owner, id)
        .await?
        .ok_or_else(|| decision_not_found(id).into())
}
