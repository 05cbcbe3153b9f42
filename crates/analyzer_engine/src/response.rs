use analyzer_core::{CellValue, SimilarityReport, SimilarityRow, RESUME_COLUMN, SIMILARITY_COLUMN};
use serde_json::{Map, Value};

use crate::{FailureKind, SubmitError};

const REPORT_FIELD: &str = "similarity_report";
const ERROR_FIELD: &str = "error";

/// Decodes `{"similarity_report": [{"Resume": .., "Similarity": .., ..}, ..]}`.
///
/// Fields other than `similarity_report` (the backend also sends
/// `excel_file_path`) are ignored. Extra row keys are kept in payload order.
pub fn decode_similarity_report(body: &[u8]) -> Result<SimilarityReport, SubmitError> {
    let value: Value = serde_json::from_slice(body).map_err(|err| malformed(err.to_string()))?;
    let entries = value
        .get(REPORT_FIELD)
        .ok_or_else(|| malformed(format!("missing `{REPORT_FIELD}`")))?
        .as_array()
        .ok_or_else(|| malformed(format!("`{REPORT_FIELD}` is not an array")))?;

    let rows = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let object = entry
                .as_object()
                .ok_or_else(|| malformed(format!("row {index} is not an object")))?;
            decode_row(index, object)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SimilarityReport::new(rows))
}

/// Pulls the backend's `{"error": "..."}` message out of a failure body, if any.
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get(ERROR_FIELD)? {
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

fn decode_row(index: usize, object: &Map<String, Value>) -> Result<SimilarityRow, SubmitError> {
    let resume = match object.get(RESUME_COLUMN) {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(malformed(format!("row {index}: `Resume` is not a string"))),
        None => return Err(malformed(format!("row {index}: missing `Resume`"))),
    };
    let similarity = match object.get(SIMILARITY_COLUMN) {
        Some(Value::Number(number)) => number
            .as_f64()
            .map(CellValue::Number)
            .ok_or_else(|| malformed(format!("row {index}: `Similarity` out of range")))?,
        Some(Value::String(text)) => CellValue::Text(text.clone()),
        Some(_) => {
            return Err(malformed(format!(
                "row {index}: `Similarity` is neither number nor string"
            )))
        }
        None => return Err(malformed(format!("row {index}: missing `Similarity`"))),
    };

    let extra = object
        .iter()
        .filter(|(key, _)| key.as_str() != RESUME_COLUMN && key.as_str() != SIMILARITY_COLUMN)
        .map(|(key, value)| (key.clone(), to_cell(value)))
        .collect();

    Ok(SimilarityRow {
        resume,
        similarity,
        extra,
    })
}

fn to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(flag) => CellValue::Bool(*flag),
        Value::Number(number) => number
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(number.to_string())),
        Value::String(text) => CellValue::Text(text.clone()),
        nested => CellValue::Text(nested.to_string()),
    }
}

fn malformed(message: impl Into<String>) -> SubmitError {
    SubmitError::new(FailureKind::MalformedResponse, message)
}
