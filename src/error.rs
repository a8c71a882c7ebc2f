//! Fatal pipeline errors.
//!
//! Missing values and unmatched join keys are deliberately absent from this
//! taxonomy: the fill policy and the `"unknown"` buckets absorb them.

use std::path::PathBuf;

use thiserror::Error;

use crate::loader::SourceKind;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read {kind} source {path:?}: {reason}")]
    SourceRead {
        kind: SourceKind,
        path: PathBuf,
        reason: String,
    },
    #[error(
        "No 'price' or price-like column found in joined columns [{}]; check the pizza catalog structure",
        columns.join(", ")
    )]
    SchemaResolution { columns: Vec<String> },
    #[error("Failed to parse date '{date}' and time '{time}' for order '{order_id}' (line item row {row})")]
    DateParse {
        row: usize,
        order_id: String,
        date: String,
        time: String,
    },
}

impl PipelineError {
    pub fn source_read(kind: SourceKind, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PipelineError::SourceRead {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
