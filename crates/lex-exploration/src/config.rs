//! Configuration types for an exploration session.
//!
//! This module provides configuration options using the builder pattern.
//! The values here are the session defaults; every render pass may override
//! the interactive ones through [`crate::DashboardParams`].

use serde::{Deserialize, Serialize};

use crate::types::FillMethod;

/// What to do when a column selected for imputation has no values at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UndefinedFillPolicy {
    /// Keep the column as-is and report it as unfilled
    #[default]
    LeaveMissing,
    /// Abort the imputation with an error
    Fail,
}

/// Configuration for an exploration session.
///
/// Use [`ProfilerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_exploration::config::ProfilerConfig;
/// use lex_exploration::FillMethod;
///
/// let config = ProfilerConfig::builder()
///     .row_limit(10_000)
///     .impute_threshold(20.0)
///     .fill_method(FillMethod::Median)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Maximum number of rows read from the source.
    /// Default: None (read everything)
    pub row_limit: Option<usize>,

    /// Number of rows polars inspects to infer column types.
    /// Default: None (scan every row)
    pub infer_schema_length: Option<usize>,

    /// Number of rows shown in the preview table.
    /// Clamped to the table height at render time.
    /// Default: 10
    pub preview_rows: usize,

    /// Missing-percentage threshold (0 - 100) for imputation eligibility.
    /// Columns whose missing percentage is at or below it are imputed.
    /// Default: 0.0
    pub impute_threshold: f64,

    /// Fill method for imputation.
    /// Default: Mean
    pub fill_method: FillMethod,

    /// Behavior for selected columns without any value.
    /// Default: LeaveMissing
    pub undefined_fill: UndefinedFillPolicy,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            row_limit: None,
            infer_schema_length: None,
            preview_rows: 10,
            impute_threshold: 0.0,
            fill_method: FillMethod::default(),
            undefined_fill: UndefinedFillPolicy::default(),
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=100.0).contains(&self.impute_threshold) {
            return Err(ConfigValidationError::InvalidThreshold(
                self.impute_threshold,
            ));
        }

        if self.preview_rows == 0 {
            return Err(ConfigValidationError::ZeroValue("preview_rows".to_string()));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::ZeroValue(
                "infer_schema_length".to_string(),
            ));
        }

        if self.row_limit == Some(0) {
            return Err(ConfigValidationError::ZeroValue("row_limit".to_string()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid imputation threshold: {0} (must be between 0 and 100)")]
    InvalidThreshold(f64),

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroValue(String),
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    row_limit: Option<usize>,
    infer_schema_length: Option<usize>,
    preview_rows: Option<usize>,
    impute_threshold: Option<f64>,
    fill_method: Option<FillMethod>,
    undefined_fill: Option<UndefinedFillPolicy>,
}

impl ProfilerConfigBuilder {
    /// Limit the number of rows read from the source.
    pub fn row_limit(mut self, rows: usize) -> Self {
        self.row_limit = Some(rows);
        self
    }

    /// Infer column types from the first `rows` rows only.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the number of preview rows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the missing-percentage threshold for imputation.
    ///
    /// # Arguments
    /// * `percent` - Value between 0 and 100 (e.g., 20.0 = 20%)
    pub fn impute_threshold(mut self, percent: f64) -> Self {
        self.impute_threshold = Some(percent);
        self
    }

    /// Set the imputation fill method.
    pub fn fill_method(mut self, method: FillMethod) -> Self {
        self.fill_method = Some(method);
        self
    }

    /// Set the policy for columns without any value.
    pub fn undefined_fill(mut self, policy: UndefinedFillPolicy) -> Self {
        self.undefined_fill = Some(policy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let config = ProfilerConfig {
            row_limit: self.row_limit,
            infer_schema_length: self.infer_schema_length,
            preview_rows: self.preview_rows.unwrap_or(10),
            impute_threshold: self.impute_threshold.unwrap_or(0.0),
            fill_method: self.fill_method.unwrap_or_default(),
            undefined_fill: self.undefined_fill.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
