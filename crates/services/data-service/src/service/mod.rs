mod analysis_recorder;
mod data_access;

pub use analysis_recorder::{AnalysisRecorder, CombinedAnalysisStatistics, CompletionOutcome};
pub use data_access::{DataAccess, DocumentRepositories, RelationalRepositories};
