/// Extensions the scoring backend reads; other uploads are silently skipped there.
const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "docx"];

pub fn is_supported_resume(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub job_description: String,
    pub files: Vec<FileRowView>,
    pub submitting: bool,
    pub can_submit: bool,
    pub can_export: bool,
    /// `None` renders no table and no export control.
    pub report_rows: Option<Vec<ReportRowView>>,
    pub report_received_at: Option<String>,
    pub error: Option<String>,
    pub status: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub name: String,
    pub supported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRowView {
    pub resume: String,
    pub similarity: String,
}
