//! Exploratory Data Analysis Library
//!
//! Profiling, univariate statistics and simple imputation for tabular
//! datasets, built on Polars.
//!
//! # Overview
//!
//! - **Loading**: CSV decoding with common missing-value markers and an optional row limit
//! - **Profiling**: Per-column dtype, numeric/categorical kind and missing-value counts
//! - **Statistics**: Descriptive statistics, histograms and column aggregates
//! - **Imputation**: Mean/median fill of numeric columns under a missing-percentage threshold
//! - **Export**: CSV serialization and an inline base64 download link
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_exploration::{Dashboard, DashboardParams, ProfilerConfig, Session};
//!
//! let config = ProfilerConfig::builder()
//!     .row_limit(1_000)
//!     .impute_threshold(20.0)
//!     .build()?;
//!
//! let mut session = Session::new(config);
//! session.load_path("titanic.csv")?;
//!
//! let params = DashboardParams::from(session.config());
//! let report = Dashboard::render_session(&session, &params)?;
//!
//! println!("Numeric columns: {:?}", report.numeric_columns);
//! println!("{}", report.download_link);
//! ```
//!
//! # Lower-level operations
//!
//! Every dashboard section is also available on its own:
//!
//! ```rust,ignore
//! use lex_exploration::{AggregateOp, FillMethod, StatisticalImputer, TableProfiler};
//! use lex_exploration::config::UndefinedFillPolicy;
//!
//! let profiles = TableProfiler::profile(&df)?;
//! let (numeric, _categorical) = TableProfiler::split_columns(&profiles);
//!
//! let stats = TableProfiler::describe_column(&df, "Age")?;
//! let hist = TableProfiler::auto_histogram(&df, "Age")?;
//! let medians = TableProfiler::aggregate(&df, &numeric, AggregateOp::Median)?;
//!
//! let imputed = StatisticalImputer::impute(
//!     &df,
//!     &profiles,
//!     &numeric,
//!     20.0,
//!     FillMethod::Mean,
//!     UndefinedFillPolicy::LeaveMissing,
//! )?;
//! ```

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod imputers;
pub mod loader;
pub mod profiler;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder, UndefinedFillPolicy};
pub use dashboard::{Dashboard, DashboardParams, DashboardReport, Preview, UnivariateReport};
pub use error::{ProfilerError, Result as ProfilerResult, ResultExt};
pub use export::{download_link, to_csv_string, write_csv};
pub use imputers::StatisticalImputer;
pub use loader::{LoadOptions, load_csv_bytes, load_csv_path};
pub use profiler::TableProfiler;
pub use session::{LoadedTable, Session, SourceId, SourceInfo};
pub use types::{
    AggregateOp, AggregateResult, ColumnKind, ColumnProfile, DescribeTable, DescriptiveStats,
    FillMethod, Histogram, ImputationSummary, ImputedTable,
};
pub use utils::{column_kind, is_numeric_dtype};
