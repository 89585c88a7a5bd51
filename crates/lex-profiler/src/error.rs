//! Error types for dataset profiling.
//!
//! Only dataset-level failures are errors. Unparsable values, missing fields
//! and rows lacking a grouping key are handled locally by the profiler and
//! never surface here.
//!
//! Errors serialize as `{ code, message }` so they can be embedded in the
//! JSON batch summary.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the profiler.
#[derive(Error, Debug)]
pub enum ProfilingError {
    /// Input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Another source in the same batch already writes to this report path.
    #[error("Report path {} is already claimed by {}", .path.display(), .claimed_by.display())]
    OutputCollision { path: PathBuf, claimed_by: PathBuf },

    /// Report could not be written.
    #[error("Failed to write report {}: {reason}", .path.display())]
    ReportWriteFailed { path: PathBuf, reason: String },

    /// Internal error (e.g., worker thread failure).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProfilingError>,
    },
}

impl ProfilingError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProfilingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used in the batch summary.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::OutputCollision { .. } => "OUTPUT_COLLISION",
            Self::ReportWriteFailed { .. } => "REPORT_WRITE_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error stems from the input itself rather than from the
    /// profiler or the output side.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::SourceNotFound(_) | Self::Polars(_) => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for ProfilingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProfilingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfilingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProfilingError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProfilingError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProfilingError::SourceNotFound(PathBuf::from("a.csv")).error_code(),
            "SOURCE_NOT_FOUND"
        );
        assert_eq!(
            ProfilingError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(ProfilingError::SourceNotFound(PathBuf::from("a.csv")).is_input_error());
        assert!(
            ProfilingError::SourceNotFound(PathBuf::from("a.csv"))
                .with_context("Loading")
                .is_input_error()
        );
        assert!(!ProfilingError::Internal("boom".to_string()).is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = ProfilingError::ColumnNotFound("page_id".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("page_id"));
    }

    #[test]
    fn test_with_context() {
        let error = ProfilingError::ColumnNotFound("test".to_string()).with_context("During sampling");
        assert!(error.to_string().contains("During sampling"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_output_collision_message() {
        let error = ProfilingError::OutputCollision {
            path: PathBuf::from("out/a_stats.txt"),
            claimed_by: PathBuf::from("first/a.csv"),
        };
        let message = error.to_string();
        assert!(message.contains("out/a_stats.txt"));
        assert!(message.contains("first/a.csv"));
    }
}
