use std::path::Path;
use std::time::Duration;

use analyzer_core::SelectedFile;
use analyzer_logging::{analyzer_debug, analyzer_info};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};

use crate::response::{decode_similarity_report, extract_error_message};
use crate::{FailureKind, SimilarityReport, Submission, SubmitError};

pub const DEFAULT_ENDPOINT: &str = "https://127.0.0.1:5000/calculate_similarity";

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const FILES_FIELD: &str = "files";
/// Failure bodies are only read for an `error` message; cap what we buffer.
const ERROR_BODY_LIMIT: u64 = 64 * 1024;

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    /// `None` waits for the backend indefinitely.
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
    pub accept_invalid_certs: bool,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_response_bytes: 5 * 1024 * 1024,
            accept_invalid_certs: false,
        }
    }
}

#[async_trait::async_trait]
pub trait SimilarityClient: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SimilarityReport, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSimilarityClient {
    settings: SubmitSettings,
}

impl ReqwestSimilarityClient {
    pub fn new(settings: SubmitSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SubmitSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, SubmitError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .danger_accept_invalid_certs(self.settings.accept_invalid_certs);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))
    }

    async fn build_form(&self, submission: &Submission) -> Result<Form, SubmitError> {
        let mut form = Form::new().text(JOB_DESCRIPTION_FIELD, submission.job_description.clone());
        for file in &submission.files {
            form = form.part(FILES_FIELD, read_part(file).await?);
        }
        Ok(form)
    }

    async fn read_body(
        &self,
        response: reqwest::Response,
        max_bytes: u64,
    ) -> Result<Vec<u8>, SubmitError> {
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl SimilarityClient for ReqwestSimilarityClient {
    async fn submit(&self, submission: &Submission) -> Result<SimilarityReport, SubmitError> {
        let endpoint = url::Url::parse(&self.settings.endpoint)
            .map_err(|err| SubmitError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = self.build_client()?;
        let form = self.build_form(submission).await?;

        analyzer_info!(
            "POST {} files={} description_len={}",
            endpoint,
            submission.files.len(),
            submission.job_description.len()
        );

        let response = client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = self
                .read_body(response, ERROR_BODY_LIMIT)
                .await
                .unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let body = self
            .read_body(response, self.settings.max_response_bytes)
            .await?;
        analyzer_debug!("Received {} byte report body", body.len());
        decode_similarity_report(&body)
    }
}

async fn read_part(file: &SelectedFile) -> Result<Part, SubmitError> {
    let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
        SubmitError::new(
            FailureKind::FileUnreadable {
                path: file.path.clone(),
            },
            err.to_string(),
        )
    })?;
    Part::bytes(bytes)
        .file_name(file.name.clone())
        .mime_str(mime_for(&file.path))
        .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> SubmitError {
    SubmitError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}
