//! Decision repository adapters.
//!
//! - `InMemoryDecisionRepository` - process-local, for tests and ephemeral runs
//! - `FileDecisionRepository` - one YAML document per owner

mod file;
mod in_memory;
mod record;

pub use file::FileDecisionRepository;
pub use in_memory::InMemoryDecisionRepository;
pub use record::DecisionRecord;
