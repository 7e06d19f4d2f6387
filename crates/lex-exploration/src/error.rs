//! Custom error types for table exploration.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! profiling, imputation and loading operations.
//!
//! Errors are serializable so a renderer can display them as a message
//! instead of aborting the session.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::types::ColumnKind;

/// The main error type for exploration operations.
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric-only operation was asked for a column of another kind.
    #[error("Column '{column}' is {actual}, expected {expected}")]
    InvalidColumnKind {
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },

    /// A column selected for imputation has no values to compute a fill from.
    #[error("Cannot compute a fill value for column '{0}': it has no non-missing values")]
    UndefinedFill(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The CSV source could not be decoded.
    #[error("Failed to load dataset: {0}")]
    LoadFailed(String),

    /// No table loaded in the session.
    #[error("No data loaded")]
    NoDataLoaded,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProfilerError>,
    },
}

impl ProfilerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProfilerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a numeric-only operation hitting a categorical column.
    pub fn not_numeric(column: impl Into<String>) -> Self {
        ProfilerError::InvalidColumnKind {
            column: column.into(),
            expected: ColumnKind::Numeric,
            actual: ColumnKind::Categorical,
        }
    }

    /// Get error code for renderer handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidColumnKind { .. } => "INVALID_COLUMN_KIND",
            Self::UndefinedFill(_) => "UNDEFINED_FILL",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::LoadFailed(_) => "LOAD_FAILED",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the session can keep going after this error.
    ///
    /// User-driven mistakes (wrong column, bad parameters) only abort the
    /// current render pass.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ColumnNotFound(_)
            | Self::InvalidColumnKind { .. }
            | Self::UndefinedFill(_)
            | Self::InvalidConfig(_)
            | Self::NoDataLoaded => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProfilerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProfilerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for exploration operations.
pub type Result<T> = std::result::Result<T, ProfilerError>;

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
        self.map_err(|e| ProfilerError::Polars(e).with_context(context))
    }
}
