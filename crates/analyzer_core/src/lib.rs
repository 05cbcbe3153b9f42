//! Analyzer core: pure page state machine, report model and view-model helpers.
mod effect;
mod msg;
mod report;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{ExportedFile, Msg};
pub use report::{CellValue, SimilarityReport, SimilarityRow, RESUME_COLUMN, SIMILARITY_COLUMN};
pub use state::{
    AppState, FailureReason, FormState, PageError, RequestId, SelectedFile, SubmissionFailure,
    SubmitPhase, ValidationError,
};
pub use update::update;
pub use view_model::{is_supported_resume, AppViewModel, FileRowView, ReportRowView};
