use std::fmt;
use std::path::PathBuf;

use crate::view_model::{AppViewModel, FileRowView, ReportRowView};
use crate::{is_supported_resume, SimilarityReport};

pub type RequestId = u64;

/// A résumé picked by the user. `name` is what the backend sees as the upload file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub job_description: String,
    pub files: Vec<SelectedFile>,
}

impl FormState {
    /// Mirrors the HTML `required` attribute: only an empty value is missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.job_description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if self.files.is_empty() {
            return Err(ValidationError::MissingFiles);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting {
        request_id: RequestId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingDescription,
    MissingFiles,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingDescription => write!(f, "enter a job description first"),
            ValidationError::MissingFiles => write!(f, "select at least one résumé file"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    FileUnreadable,
    Network,
    Timeout,
    HttpStatus(u16),
    MalformedResponse,
    Cancelled,
    Other,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::FileUnreadable => write!(f, "could not read a selected file"),
            FailureReason::Network => write!(f, "could not reach the analysis service"),
            FailureReason::Timeout => write!(f, "the analysis service timed out"),
            FailureReason::HttpStatus(code) => write!(f, "the analysis service answered {code}"),
            FailureReason::MalformedResponse => {
                write!(f, "the analysis service sent an unreadable report")
            }
            FailureReason::Cancelled => write!(f, "the analysis was cancelled"),
            FailureReason::Other => write!(f, "the analysis failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    pub reason: FailureReason,
    pub message: String,
}

impl SubmissionFailure {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

/// Error shown on the page until dismissed or superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    Validation(ValidationError),
    Submission(SubmissionFailure),
    Export(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Validation(err) => write!(f, "{err}"),
            PageError::Submission(failure) if failure.message.is_empty() => {
                write!(f, "{}", failure.reason)
            }
            PageError::Submission(failure) => {
                write!(f, "{}: {}", failure.reason, failure.message)
            }
            PageError::Export(message) => write!(f, "export failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    form: FormState,
    phase: SubmitPhase,
    report: Option<SimilarityReport>,
    report_received_at: Option<String>,
    error: Option<PageError>,
    status: Option<String>,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn report(&self) -> Option<&SimilarityReport> {
        self.report.as_ref()
    }

    pub fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        let files = self
            .form
            .files
            .iter()
            .map(|file| FileRowView {
                name: file.name.clone(),
                supported: is_supported_resume(&file.name),
            })
            .collect();

        let report_rows = self.report.as_ref().map(|report| {
            report
                .rows()
                .iter()
                .map(|row| ReportRowView {
                    resume: row.resume.clone(),
                    similarity: row.similarity.to_string(),
                })
                .collect()
        });

        let submitting = matches!(self.phase, SubmitPhase::Submitting { .. });
        AppViewModel {
            job_description: self.form.job_description.clone(),
            files,
            submitting,
            can_submit: !submitting,
            can_export: self.report.is_some(),
            report_rows,
            report_received_at: self.report_received_at.clone(),
            error: self.error.as_ref().map(ToString::to_string),
            status: self.status.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_description(&mut self, text: String) {
        if self.form.job_description != text {
            self.form.job_description = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn append_description_line(&mut self, line: &str) {
        if !self.form.job_description.is_empty() {
            self.form.job_description.push('\n');
        }
        self.form.job_description.push_str(line);
        self.mark_dirty();
    }

    pub(crate) fn set_files(&mut self, files: Vec<SelectedFile>) {
        self.form.files = files;
        self.mark_dirty();
    }

    /// Starts a submission and returns its id.
    pub(crate) fn begin_submission(&mut self) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.phase = SubmitPhase::Submitting { request_id };
        self.error = None;
        self.status = None;
        self.mark_dirty();
        request_id
    }

    pub(crate) fn is_current_request(&self, request_id: RequestId) -> bool {
        self.phase == SubmitPhase::Submitting { request_id }
    }

    pub(crate) fn accept_report(&mut self, report: SimilarityReport, received_at: String) {
        self.report = Some(report);
        self.report_received_at = Some(received_at);
        self.phase = SubmitPhase::Idle;
        self.mark_dirty();
    }

    pub(crate) fn reject_submission(&mut self, failure: SubmissionFailure) {
        self.error = Some(PageError::Submission(failure));
        self.phase = SubmitPhase::Idle;
        self.mark_dirty();
    }

    /// Clears description and report; the file selection is kept.
    /// Returns the id of an in-flight submission that must be cancelled.
    pub(crate) fn reset(&mut self) -> Option<RequestId> {
        let in_flight = match self.phase {
            SubmitPhase::Submitting { request_id } => Some(request_id),
            SubmitPhase::Idle => None,
        };
        self.form.job_description.clear();
        self.report = None;
        self.report_received_at = None;
        self.error = None;
        self.status = None;
        self.phase = SubmitPhase::Idle;
        self.mark_dirty();
        in_flight
    }

    pub(crate) fn set_error(&mut self, error: PageError) {
        self.error = Some(error);
        self.mark_dirty();
    }

    pub(crate) fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_status(&mut self, status: String) {
        self.status = Some(status);
        self.mark_dirty();
    }
}
