use analyzer_core::{AppViewModel, ReportRowView};

const TITLE: &str = "Resume Analyzer";
const REPORT_TITLE: &str = "Similarity Report";

/// Renders the whole page as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![banner(TITLE)];

    lines.push("Job Description:".to_string());
    if view.job_description.is_empty() {
        lines.push("  (empty)".to_string());
    } else {
        lines.extend(view.job_description.lines().map(|line| format!("  {line}")));
    }

    lines.push(format!("Resume files ({}):", view.files.len()));
    if view.files.is_empty() {
        lines.push("  (none selected)".to_string());
    }
    for (index, file) in view.files.iter().enumerate() {
        let note = if file.supported {
            ""
        } else {
            "  [not pdf/docx, the service will skip it]"
        };
        lines.push(format!("  {}. {}{}", index + 1, file.name, note));
    }

    lines.push(if view.submitting {
        "Analyzing... waiting for the similarity service".to_string()
    } else {
        "Ready: `analyze` to submit, `reset` to clear".to_string()
    });

    if let Some(error) = &view.error {
        lines.push(format!("Error: {error}  (`dismiss` to hide)"));
    }
    if let Some(status) = &view.status {
        lines.push(status.clone());
    }

    if let Some(rows) = &view.report_rows {
        lines.push(String::new());
        lines.push(banner(REPORT_TITLE));
        if let Some(received_at) = &view.report_received_at {
            lines.push(format!("Received {received_at}"));
        }
        lines.extend(report_table(rows));
        if view.can_export {
            lines.push("`export` saves this table as similarity_report.xlsx".to_string());
        }
    }

    lines
}

fn banner(title: &str) -> String {
    format!("== {title} ==")
}

fn report_table(rows: &[ReportRowView]) -> Vec<String> {
    let headers = ["Resume", "Similarity"];
    let resume_width = rows
        .iter()
        .map(|row| row.resume.chars().count())
        .chain(std::iter::once(headers[0].len()))
        .max()
        .unwrap_or(0);
    let score_width = rows
        .iter()
        .map(|row| row.similarity.chars().count())
        .chain(std::iter::once(headers[1].len()))
        .max()
        .unwrap_or(0);

    let separator = format!(
        "+-{}-+-{}-+",
        "-".repeat(resume_width),
        "-".repeat(score_width)
    );
    let mut lines = vec![
        separator.clone(),
        table_row(headers[0], headers[1], resume_width, score_width),
        separator.clone(),
    ];
    if rows.is_empty() {
        lines.push("(the service returned no rows)".to_string());
    }
    for row in rows {
        lines.push(table_row(
            &row.resume,
            &row.similarity,
            resume_width,
            score_width,
        ));
    }
    lines.push(separator);
    lines
}

fn table_row(resume: &str, score: &str, resume_width: usize, score_width: usize) -> String {
    format!("| {resume:<resume_width$} | {score:>score_width$} |")
}
