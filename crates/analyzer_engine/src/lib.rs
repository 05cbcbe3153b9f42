//! Analyzer engine: multipart submission, report decoding and spreadsheet export.
mod engine;
mod export;
mod persist;
mod response;
mod submit;
mod types;

pub use analyzer_core::SimilarityReport;
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use export::{
    build_workbook, export_report, ExportError, ExportOptions, DEFAULT_EXPORT_FILENAME,
    DEFAULT_SHEET_NAME,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use response::{decode_similarity_report, extract_error_message};
pub use submit::{ReqwestSimilarityClient, SimilarityClient, SubmitSettings, DEFAULT_ENDPOINT};
pub use types::{EngineEvent, ExportSummary, FailureKind, RequestId, Submission, SubmitError};
