use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use analyzer_core::SimilarityReport;
use analyzer_logging::{analyzer_info, analyzer_warn};
use tokio_util::sync::CancellationToken;

use crate::export::{export_report, ExportOptions};
use crate::submit::{ReqwestSimilarityClient, SimilarityClient, SubmitSettings};
use crate::{EngineEvent, FailureKind, RequestId, Submission, SubmitError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub submit: SubmitSettings,
    pub output_dir: PathBuf,
    pub export: ExportOptions,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            submit: SubmitSettings::default(),
            output_dir,
            export: ExportOptions::default(),
        }
    }
}

enum EngineCommand {
    Submit {
        request_id: RequestId,
        submission: Submission,
    },
    Cancel {
        request_id: RequestId,
    },
    Export {
        report: SimilarityReport,
    },
}

type InFlight = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// Runs submissions and exports on a dedicated tokio runtime.
///
/// Commands go in through [`EngineHandle::submit`] and friends; results come
/// back as [`EngineEvent`]s polled with [`EngineHandle::try_recv`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let client = Arc::new(ReqwestSimilarityClient::new(config.submit.clone()));
        Self::with_client(config, client)
    }

    pub fn with_client(
        config: EngineConfig,
        client: Arc<dyn SimilarityClient>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let in_flight: InFlight = Arc::default();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Submit {
                        request_id,
                        submission,
                    } => {
                        let token = CancellationToken::new();
                        if let Ok(mut map) = in_flight.lock() {
                            map.insert(request_id, token.clone());
                        }
                        runtime.spawn(run_submission(
                            client.clone(),
                            request_id,
                            submission,
                            token,
                            in_flight.clone(),
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::Cancel { request_id } => {
                        let token = in_flight
                            .lock()
                            .ok()
                            .and_then(|mut map| map.remove(&request_id));
                        match token {
                            Some(token) => {
                                analyzer_info!("Cancelling request {}", request_id);
                                token.cancel();
                            }
                            None => analyzer_warn!(
                                "Cancel for request {} ignored; not in flight",
                                request_id
                            ),
                        }
                    }
                    EngineCommand::Export { report } => {
                        let output_dir = config.output_dir.clone();
                        let options = config.export.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn_blocking(move || {
                            let result = export_report(&output_dir, &report, &options)
                                .map_err(|err| err.to_string());
                            let _ = event_tx.send(EngineEvent::ExportCompleted { result });
                        });
                    }
                }
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn submit(&self, request_id: RequestId, submission: Submission) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            request_id,
            submission,
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }

    pub fn export(&self, report: SimilarityReport) {
        let _ = self.cmd_tx.send(EngineCommand::Export { report });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn run_submission(
    client: Arc<dyn SimilarityClient>,
    request_id: RequestId,
    submission: Submission,
    token: CancellationToken,
    in_flight: InFlight,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = tokio::select! {
        _ = token.cancelled() => Err(SubmitError::new(FailureKind::Cancelled, "cancelled by reset")),
        result = client.submit(&submission) => result,
    };
    if let Ok(mut map) = in_flight.lock() {
        map.remove(&request_id);
    }
    if let Err(err) = &result {
        analyzer_warn!("Request {} failed: {}", request_id, err);
    }
    let _ = event_tx.send(EngineEvent::SubmissionCompleted { request_id, result });
}
