use std::fmt;

pub const RESUME_COLUMN: &str = "Resume";
pub const SIMILARITY_COLUMN: &str = "Similarity";

/// Scalar cell value taken verbatim from the backend payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(value) => write!(f, "{value}"),
            CellValue::Number(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

/// One scored résumé. `similarity` is a number or text, as the backend chose.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityRow {
    pub resume: String,
    pub similarity: CellValue,
    /// Any further keys the backend sent, in payload order.
    pub extra: Vec<(String, CellValue)>,
}

impl SimilarityRow {
    pub fn new(resume: impl Into<String>, similarity: CellValue) -> Self {
        Self {
            resume: resume.into(),
            similarity,
            extra: Vec::new(),
        }
    }

    /// Looks up a cell by column name. Missing extra keys yield `None`.
    pub fn value(&self, column: &str) -> Option<CellValue> {
        match column {
            RESUME_COLUMN => Some(CellValue::Text(self.resume.clone())),
            SIMILARITY_COLUMN => Some(self.similarity.clone()),
            _ => self
                .extra
                .iter()
                .find(|(key, _)| key == column)
                .map(|(_, value)| value.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimilarityReport {
    rows: Vec<SimilarityRow>,
}

impl SimilarityReport {
    pub fn new(rows: Vec<SimilarityRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[SimilarityRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `Resume`, `Similarity`, then every extra key in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![RESUME_COLUMN.to_string(), SIMILARITY_COLUMN.to_string()];
        for row in &self.rows {
            for (key, _) in &row.extra {
                if !columns.iter().any(|existing| existing == key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }
}
