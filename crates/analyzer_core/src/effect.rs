use crate::{RequestId, SelectedFile, SimilarityReport};

/// IO requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Post the form as one multipart request.
    Submit {
        request_id: RequestId,
        job_description: String,
        files: Vec<SelectedFile>,
    },
    /// Abort an in-flight submission.
    CancelSubmission { request_id: RequestId },
    /// Serialize the report to a spreadsheet file.
    ExportReport { report: SimilarityReport },
}
