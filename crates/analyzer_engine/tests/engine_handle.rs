use std::sync::Arc;
use std::time::Duration;

use analyzer_core::{CellValue, SimilarityReport, SimilarityRow};
use analyzer_engine::{
    EngineConfig, EngineEvent, EngineHandle, FailureKind, SimilarityClient, Submission,
    SubmitError,
};

/// Answers after `delay` with a one-row report named after the description.
struct SlowClient {
    delay: Duration,
}

#[async_trait::async_trait]
impl SimilarityClient for SlowClient {
    async fn submit(&self, submission: &Submission) -> Result<SimilarityReport, SubmitError> {
        tokio::time::sleep(self.delay).await;
        Ok(SimilarityReport::new(vec![SimilarityRow::new(
            submission.job_description.clone(),
            CellValue::Number(1.0),
        )]))
    }
}

async fn next_event(engine: &EngineHandle) -> EngineEvent {
    for _ in 0..200 {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no engine event within 2s");
}

fn submission(description: &str) -> Submission {
    Submission {
        job_description: description.to_string(),
        files: Vec::new(),
    }
}

fn engine_with(delay: Duration, output_dir: std::path::PathBuf) -> EngineHandle {
    EngineHandle::with_client(
        EngineConfig::default_with_output(output_dir),
        Arc::new(SlowClient { delay }),
    )
    .expect("engine starts")
}

#[tokio::test]
async fn completed_submission_is_reported_with_its_request_id() {
    let temp = tempfile::TempDir::new().unwrap();
    let engine = engine_with(Duration::from_millis(10), temp.path().to_path_buf());

    engine.submit(7, submission("jd"));

    match next_event(&engine).await {
        EngineEvent::SubmissionCompleted { request_id, result } => {
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap().rows()[0].resume, "jd");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn cancel_completes_in_flight_submission_as_cancelled() {
    let temp = tempfile::TempDir::new().unwrap();
    let engine = engine_with(Duration::from_secs(30), temp.path().to_path_buf());

    engine.submit(1, submission("jd"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.cancel(1);

    match next_event(&engine).await {
        EngineEvent::SubmissionCompleted { request_id, result } => {
            assert_eq!(request_id, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::Cancelled);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn export_writes_workbook_and_reports_path() {
    let temp = tempfile::TempDir::new().unwrap();
    let engine = engine_with(Duration::from_millis(10), temp.path().to_path_buf());
    let report =
        SimilarityReport::new(vec![SimilarityRow::new("a.pdf", CellValue::Number(0.3))]);

    engine.export(report);

    match next_event(&engine).await {
        EngineEvent::ExportCompleted { result } => {
            let summary = result.expect("export ok");
            assert_eq!(summary.output_path, temp.path().join("similarity_report.xlsx"));
            assert_eq!(summary.row_count, 1);
            assert!(summary.output_path.exists());
        }
        other => panic!("unexpected event {other:?}"),
    }
}
