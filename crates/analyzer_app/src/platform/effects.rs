use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use analyzer_core::{Effect, ExportedFile, FailureReason, Msg, SubmissionFailure};
use analyzer_engine::{
    EngineConfig, EngineError, EngineEvent, EngineHandle, FailureKind, Submission, SubmitError,
};
use analyzer_logging::{analyzer_info, analyzer_warn};
use chrono::Local;

use super::app::Inbox;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, inbox: mpsc::Sender<Inbox>) -> Result<Self, EngineError> {
        analyzer_info!(
            "Engine endpoint={} output_dir={:?} timeout={:?}",
            config.submit.endpoint,
            config.output_dir,
            config.submit.request_timeout
        );
        let engine = EngineHandle::new(config)?;
        let runner = Self { engine };
        runner.spawn_event_loop(inbox);
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit {
                    request_id,
                    job_description,
                    files,
                } => {
                    analyzer_info!(
                        "Submit request_id={} files={} description_len={}",
                        request_id,
                        files.len(),
                        job_description.len()
                    );
                    self.engine.submit(
                        request_id,
                        Submission {
                            job_description,
                            files,
                        },
                    );
                }
                Effect::CancelSubmission { request_id } => {
                    self.engine.cancel(request_id);
                }
                Effect::ExportReport { report } => {
                    analyzer_info!("Export rows={}", report.len());
                    self.engine.export(report);
                }
            }
        }
    }

    fn spawn_event_loop(&self, inbox: mpsc::Sender<Inbox>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if inbox.send(Inbox::Msg(map_event(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SubmissionCompleted {
            request_id,
            result: Ok(report),
        } => Msg::SubmissionSucceeded {
            request_id,
            report,
            received_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        EngineEvent::SubmissionCompleted {
            request_id,
            result: Err(err),
        } => Msg::SubmissionFailed {
            request_id,
            failure: map_failure(err),
        },
        EngineEvent::ExportCompleted { result } => {
            if let Err(message) = &result {
                analyzer_warn!("Export failed: {}", message);
            }
            Msg::ExportFinished(result.map(|summary| ExportedFile {
                path: summary.output_path,
                row_count: summary.row_count,
            }))
        }
    }
}

fn map_failure(err: SubmitError) -> SubmissionFailure {
    let reason = match &err.kind {
        FailureKind::FileUnreadable { .. } => FailureReason::FileUnreadable,
        FailureKind::Network => FailureReason::Network,
        FailureKind::Timeout => FailureReason::Timeout,
        FailureKind::HttpStatus(code) => FailureReason::HttpStatus(*code),
        FailureKind::MalformedResponse | FailureKind::TooLarge { .. } => {
            FailureReason::MalformedResponse
        }
        FailureKind::Cancelled => FailureReason::Cancelled,
        FailureKind::InvalidEndpoint => FailureReason::Other,
    };
    let message = match &err.kind {
        FailureKind::FileUnreadable { path } => format!("{}: {}", path.display(), err.message),
        FailureKind::InvalidEndpoint | FailureKind::TooLarge { .. } => err.to_string(),
        _ => err.message,
    };
    SubmissionFailure::new(reason, message)
}
