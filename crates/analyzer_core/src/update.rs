use crate::{AppState, Effect, ExportedFile, Msg, PageError, SubmitPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DescriptionChanged(text) => {
            state.set_description(text);
            Vec::new()
        }
        Msg::DescriptionAppended(line) => {
            state.append_description_line(&line);
            Vec::new()
        }
        Msg::FilesSelected(files) => {
            state.set_files(files);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // One submission at a time; the control is disabled while in flight.
            if state.phase() != SubmitPhase::Idle {
                return (state, Vec::new());
            }
            if let Err(err) = state.form().validate() {
                state.set_error(PageError::Validation(err));
                return (state, Vec::new());
            }
            let request_id = state.begin_submission();
            let form = state.form();
            vec![Effect::Submit {
                request_id,
                job_description: form.job_description.clone(),
                files: form.files.clone(),
            }]
        }
        Msg::SubmissionSucceeded {
            request_id,
            report,
            received_at,
        } => {
            if state.is_current_request(request_id) {
                state.accept_report(report, received_at);
            }
            Vec::new()
        }
        Msg::SubmissionFailed {
            request_id,
            failure,
        } => {
            if state.is_current_request(request_id) {
                state.reject_submission(failure);
            }
            Vec::new()
        }
        Msg::ResetClicked => match state.reset() {
            Some(request_id) => vec![Effect::CancelSubmission { request_id }],
            None => Vec::new(),
        },
        Msg::ExportClicked => match state.report() {
            Some(report) => vec![Effect::ExportReport {
                report: report.clone(),
            }],
            None => Vec::new(),
        },
        Msg::ExportFinished(Ok(ExportedFile { path, row_count })) => {
            state.set_status(format!(
                "Exported {row_count} row(s) to {}",
                path.display()
            ));
            Vec::new()
        }
        Msg::ExportFinished(Err(message)) => {
            state.set_error(PageError::Export(message));
            Vec::new()
        }
        Msg::ErrorDismissed => {
            state.clear_error();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
