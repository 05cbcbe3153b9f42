use std::path::Path;
use std::time::Duration;

use analyzer_core::{CellValue, SelectedFile, SimilarityRow};
use analyzer_engine::{
    FailureKind, ReqwestSimilarityClient, SimilarityClient, Submission, SubmitSettings,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> SubmitSettings {
    SubmitSettings {
        endpoint: format!("{}/calculate_similarity", server.uri()),
        ..SubmitSettings::default()
    }
}

fn write_resume(dir: &Path, name: &str, contents: &str) -> SelectedFile {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    SelectedFile::from_path(path)
}

fn report_body() -> serde_json::Value {
    serde_json::json!({
        "similarity_report": [
            {"Resume": "a.pdf", "Similarity": 0.82},
            {"Resume": "b.pdf", "Similarity": 0.41}
        ]
    })
}

#[tokio::test]
async fn posts_description_and_files_as_multipart_in_selection_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calculate_similarity"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_body()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let submission = Submission {
        job_description: "Senior Rust engineer".to_string(),
        files: vec![
            write_resume(temp.path(), "a.pdf", "resume A"),
            write_resume(temp.path(), "b.pdf", "resume B"),
        ],
    };

    let client = ReqwestSimilarityClient::new(settings_for(&server));
    let report = client.submit(&submission).await.expect("submit ok");

    assert_eq!(
        report.rows(),
        &[
            SimilarityRow::new("a.pdf", CellValue::Number(0.82)),
            SimilarityRow::new("b.pdf", CellValue::Number(0.41)),
        ]
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body).into_owned();

    let description = body
        .find("name=\"job_description\"")
        .expect("description field");
    assert!(body.contains("Senior Rust engineer"));
    let first = body
        .find("name=\"files\"; filename=\"a.pdf\"")
        .expect("first file part");
    let second = body
        .find("name=\"files\"; filename=\"b.pdf\"")
        .expect("second file part");
    assert!(description < first && first < second);
    assert_eq!(body.matches("name=\"files\"").count(), 2);
    assert!(body.contains("resume A"));
    assert!(body.contains("resume B"));
    assert!(body.contains("Content-Type: application/pdf"));
}

#[tokio::test]
async fn http_error_carries_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calculate_similarity"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "boom"})),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let submission = Submission {
        job_description: "JD".to_string(),
        files: vec![write_resume(temp.path(), "a.pdf", "A")],
    };

    let client = ReqwestSimilarityClient::new(settings_for(&server));
    let err = client.submit(&submission).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.message, "boom");
}

#[tokio::test]
async fn malformed_success_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let submission = Submission {
        job_description: "JD".to_string(),
        files: vec![write_resume(temp.path(), "a.pdf", "A")],
    };

    let client = ReqwestSimilarityClient::new(settings_for(&server));
    let err = client.submit(&submission).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn unreadable_file_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_body()))
        .expect(0)
        .mount(&server)
        .await;

    let missing = SelectedFile::from_path("/definitely/not/here.pdf");
    let submission = Submission {
        job_description: "JD".to_string(),
        files: vec![missing.clone()],
    };

    let client = ReqwestSimilarityClient::new(settings_for(&server));
    let err = client.submit(&submission).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::FileUnreadable { path: missing.path });
}

#[tokio::test]
async fn request_timeout_is_honoured_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(report_body()),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let submission = Submission {
        job_description: "JD".to_string(),
        files: vec![write_resume(temp.path(), "a.pdf", "A")],
    };
    let settings = SubmitSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..settings_for(&server)
    };

    let client = ReqwestSimilarityClient::new(settings);
    let err = client.submit(&submission).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_report_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_body()))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let submission = Submission {
        job_description: "JD".to_string(),
        files: vec![write_resume(temp.path(), "a.pdf", "A")],
    };
    let settings = SubmitSettings {
        max_response_bytes: 16,
        ..settings_for(&server)
    };

    let client = ReqwestSimilarityClient::new(settings);
    let err = client.submit(&submission).await.unwrap_err();

    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }));
}

#[tokio::test]
async fn invalid_endpoint_is_reported() {
    let client = ReqwestSimilarityClient::new(SubmitSettings {
        endpoint: "not a url".to_string(),
        ..SubmitSettings::default()
    });
    let submission = Submission {
        job_description: "JD".to_string(),
        files: Vec::new(),
    };

    let err = client.submit(&submission).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::InvalidEndpoint);
}
