use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User replaced the job description text.
    DescriptionChanged(String),
    /// User appended a line to the job description.
    DescriptionAppended(String),
    /// User picked a new set of résumé files (replaces the previous selection).
    FilesSelected(Vec<crate::SelectedFile>),
    /// User clicked Analyze.
    SubmitClicked,
    /// Backend answered a submission with a decodable report.
    SubmissionSucceeded {
        request_id: crate::RequestId,
        report: crate::SimilarityReport,
        received_at: String,
    },
    /// Submission failed in transport, status or decoding.
    SubmissionFailed {
        request_id: crate::RequestId,
        failure: crate::SubmissionFailure,
    },
    /// User clicked Reset.
    ResetClicked,
    /// User clicked Export to Excel.
    ExportClicked,
    /// Engine finished writing (or failed to write) the spreadsheet.
    ExportFinished(Result<ExportedFile, String>),
    /// User acknowledged the visible error.
    ErrorDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
