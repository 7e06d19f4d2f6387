//! Dashboard render pass.
//!
//! [`Dashboard::render`] computes every section of the exploration page in
//! one synchronous pass over the loaded table. The output is a plain
//! serializable report; drawing it is left to the caller (the CLI prints
//! it, a UI would serialize it).
//!
//! Any error aborts the pass. Nothing in the session is modified, so the
//! next pass can run with corrected parameters.

use chrono::Local;
use polars::prelude::DataFrame;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{ProfilerConfig, UndefinedFillPolicy};
use crate::error::{ResultExt, Result};
use crate::export::download_link;
use crate::imputers::StatisticalImputer;
use crate::profiler::TableProfiler;
use crate::session::{LoadedTable, Session, SourceInfo};
use crate::types::{
    AggregateOp, AggregateResult, ColumnProfile, DescribeTable, DescriptiveStats, FillMethod,
    Histogram, ImputationSummary,
};
use crate::utils::head_rows;

/// Upper bound of the preview row selector.
pub const MAX_PREVIEW_ROWS: usize = 100;

/// Interactive parameters of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardParams {
    pub preview_rows: usize,
    pub transpose_describe: bool,
    /// Column for the univariate section; the first numeric column if unset.
    pub selected_column: Option<String>,
    pub aggregate: Option<AggregateOp>,
    pub impute_threshold: f64,
    pub fill_method: FillMethod,
    pub undefined_fill: UndefinedFillPolicy,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self::from(&ProfilerConfig::default())
    }
}

impl From<&ProfilerConfig> for DashboardParams {
    fn from(config: &ProfilerConfig) -> Self {
        Self {
            preview_rows: config.preview_rows,
            transpose_describe: false,
            selected_column: None,
            aggregate: None,
            impute_threshold: config.impute_threshold,
            fill_method: config.fill_method,
            undefined_fill: config.undefined_fill,
        }
    }
}

/// First rows of the table.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Largest row count the selector allows.
    pub max_rows: usize,
}

/// Univariate view of one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct UnivariateReport {
    pub column: String,
    pub distinct_count: usize,
    pub histogram: Histogram,
    pub stats: DescriptiveStats,
}

/// Everything the exploration page shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub source: SourceInfo,
    pub shape: (usize, usize),
    pub preview: Preview,
    pub categorical_columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub column_profiles: Vec<ColumnProfile>,
    pub describe: DescribeTable,
    pub univariate: Option<UnivariateReport>,
    pub aggregate: Option<AggregateResult>,
    /// Profiles of the columns with at least one missing value.
    pub missing: Vec<ColumnProfile>,
    pub imputation: ImputationSummary,
    /// The imputed columns, as offered for download.
    #[serde(skip)]
    pub imputed_df: DataFrame,
    pub download_link: String,
}

/// Renders [`DashboardReport`]s.
pub struct Dashboard;

impl Dashboard {
    /// Render the session's loaded table.
    pub fn render_session(session: &Session, params: &DashboardParams) -> Result<DashboardReport> {
        Self::render(session.loaded()?, params)
    }

    /// Render one pass over a loaded table.
    pub fn render(table: &LoadedTable, params: &DashboardParams) -> Result<DashboardReport> {
        let df = &table.df;
        let profiles = &table.profiles;
        info!("Rendering dashboard for '{}' {:?}", table.source.name, df.shape());

        let (numeric_columns, categorical_columns) = TableProfiler::split_columns(profiles);

        let preview = Self::preview(table, params.preview_rows);

        let describe = TableProfiler::describe_all(df, &numeric_columns, params.transpose_describe)
            .context("Describing numeric columns")?;

        let univariate = match params
            .selected_column
            .as_ref()
            .or_else(|| numeric_columns.first())
        {
            Some(column) => Some(Self::univariate(table, column)?),
            None => {
                debug!("No numeric columns; skipping univariate section");
                None
            }
        };

        let aggregate = params
            .aggregate
            .map(|op| TableProfiler::aggregate(df, &numeric_columns, op))
            .transpose()
            .context("Aggregating numeric columns")?;

        let missing = TableProfiler::missing_summary(profiles);

        let imputed = StatisticalImputer::impute(
            df,
            profiles,
            &numeric_columns,
            params.impute_threshold,
            params.fill_method,
            params.undefined_fill,
        )
        .context("Imputing missing values")?;

        let download_link = download_link(&imputed.df)?;

        Ok(DashboardReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: table.source.clone(),
            shape: df.shape(),
            preview,
            categorical_columns,
            numeric_columns,
            column_profiles: profiles.clone(),
            describe,
            univariate,
            aggregate,
            missing,
            imputation: imputed.summary,
            imputed_df: imputed.df,
            download_link,
        })
    }

    fn preview(table: &LoadedTable, requested: usize) -> Preview {
        let max_rows = table.df.height().min(MAX_PREVIEW_ROWS);
        let shown = requested.clamp(1, max_rows.max(1)).min(max_rows);

        Preview {
            columns: table.profiles.iter().map(|p| p.name.clone()).collect(),
            rows: head_rows(&table.df, shown),
            max_rows,
        }
    }

    fn univariate(table: &LoadedTable, column: &str) -> Result<UnivariateReport> {
        let df = &table.df;
        let stats = TableProfiler::describe_column(df, column)
            .context(format!("Univariate analysis of '{}'", column))?;

        Ok(UnivariateReport {
            column: column.to_string(),
            distinct_count: TableProfiler::distinct_count(df, column)?,
            histogram: TableProfiler::auto_histogram(df, column)?,
            stats,
        })
    }
}
