//! CLI entry point for exploratory data analysis.

use anyhow::{Result, anyhow};
use chrono::Local;
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use lex_exploration::{
    AggregateOp, Dashboard, DashboardParams, DashboardReport, DescribeTable, DescriptiveStats,
    FillMethod, ProfilerConfig, Session, UndefinedFillPolicy, write_csv,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// CLI-compatible aggregate operation enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAggregate {
    /// Mean of each numeric column
    Mean,
    /// Median of each numeric column
    Median,
    /// Sample standard deviation of each numeric column
    Std,
}

impl From<CliAggregate> for AggregateOp {
    fn from(cli: CliAggregate) -> Self {
        match cli {
            CliAggregate::Mean => AggregateOp::Mean,
            CliAggregate::Median => AggregateOp::Median,
            CliAggregate::Std => AggregateOp::Std,
        }
    }
}

/// CLI-compatible fill method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFillMethod {
    /// Fill with the mean of non-missing values
    Mean,
    /// Fill with the median of non-missing values
    Median,
}

impl From<CliFillMethod> for FillMethod {
    fn from(cli: CliFillMethod) -> Self {
        match cli {
            CliFillMethod::Mean => FillMethod::Mean,
            CliFillMethod::Median => FillMethod::Median,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Exploratory data analysis for CSV datasets",
    long_about = "Profiles a CSV dataset: column types, missing values, descriptive \
                  statistics, histograms and mean/median imputation.\n\n\
                  EXAMPLES:\n  \
                  # Full report for a file\n  \
                  lex-exploration -i titanic.csv\n\n  \
                  # First 500 rows, histogram of Age, column medians\n  \
                  lex-exploration -i titanic.csv --rows 500 --column Age --aggregate median\n\n  \
                  # Impute columns with at most 20% missing and save the result\n  \
                  lex-exploration -i titanic.csv --threshold 20 --method median --export\n\n  \
                  # Machine-readable output\n  \
                  lex-exploration -i titanic.csv --json | jq .missing"
)]
struct Args {
    /// Path to the CSV file to explore
    #[arg(short, long)]
    input: String,

    /// Read at most this many rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of rows shown in the preview (1 - 100)
    #[arg(long, default_value = "10")]
    preview: usize,

    /// Numeric column for the univariate section
    ///
    /// Defaults to the first numeric column
    #[arg(short, long)]
    column: Option<String>,

    /// Aggregate applied to every numeric column
    #[arg(long, value_enum)]
    aggregate: Option<CliAggregate>,

    /// Missing-percentage threshold for imputation (0 - 100)
    ///
    /// Numeric columns with at most this percentage of missing values are imputed
    #[arg(long, default_value = "0")]
    threshold: f64,

    /// Fill value for imputed columns
    #[arg(long, value_enum, default_value = "mean")]
    method: CliFillMethod,

    /// Show descriptive statistics with one row per column
    #[arg(long)]
    transpose: bool,

    /// Fail instead of leaving a column unfilled when it has no values
    #[arg(long)]
    fail_on_undefined_fill: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the imputed table as CSV
    ///
    /// Without a path, writes imputed_<timestamp>.csv in the current directory
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    export: Option<Option<PathBuf>>,

    /// Print the HTML download link of the imputed table
    #[arg(long)]
    link: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG from .env must be visible before the filter is built
    dotenv().ok();
    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let mut config_builder = ProfilerConfig::builder()
        .preview_rows(args.preview.max(1))
        .impute_threshold(args.threshold)
        .fill_method(args.method.into());

    if let Some(rows) = args.rows {
        config_builder = config_builder.row_limit(rows);
    }

    if args.fail_on_undefined_fill {
        config_builder = config_builder.undefined_fill(UndefinedFillPolicy::Fail);
    }

    let config = config_builder.build()?;

    let mut session = Session::new(config);
    session
        .load_path(&args.input)
        .map_err(|e| anyhow!("Could not load '{}': {}", args.input, e))?;

    let mut params = DashboardParams::from(session.config());
    params.transpose_describe = args.transpose;
    params.selected_column = args.column.clone();
    params.aggregate = args.aggregate.map(Into::into);

    let report = match Dashboard::render_session(&session, &params) {
        Ok(report) => report,
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": e }))?);
            } else {
                error!("Dashboard failed: {}", e);
            }
            return Err(anyhow!("{}", e));
        }
    };

    if let Some(ref export) = args.export {
        let path = export.clone().unwrap_or_else(default_export_path);
        write_csv(&report.imputed_df, &path)?;
        info!("Imputed table written to: {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, &args);

    Ok(())
}

/// `imputed_<timestamp>.csv` in the working directory.
fn default_export_path() -> PathBuf {
    PathBuf::from(format!("imputed_{}.csv", Local::now().format("%Y%m%d_%H%M%S")))
}

/// Print the human-readable report.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_report(report: &DashboardReport, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    println!("EXPLORATORY DATA ANALYSIS");
    println!("{}", "=".repeat(80));
    println!();

    print_overview(report);
    print_preview(report);
    print_profiles(report);
    print_describe(&report.describe);
    print_univariate(report);
    print_aggregate(report);
    print_missing(report);
    print_imputation(report);

    if args.link {
        println!("DOWNLOAD");
        println!("{}", "-".repeat(40));
        println!("{}", report.download_link);
        println!();
    }

    println!("Use --json for machine-readable output");
    if args.export.is_none() {
        println!("Use --export to save the imputed table");
    }
    println!("{}", "=".repeat(80));
}

fn print_overview(report: &DashboardReport) {
    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", report.source.name);
    if let Some(limit) = report.source.row_limit {
        println!("  Row limit: {}", limit);
    }
    println!("  Rows: {}", report.shape.0);
    println!("  Columns: {}", report.shape.1);
    println!(
        "  Numeric ({}): {}",
        report.numeric_columns.len(),
        report.numeric_columns.join(", ")
    );
    println!(
        "  Categorical ({}): {}",
        report.categorical_columns.len(),
        report.categorical_columns.join(", ")
    );
    println!();
}

fn print_preview(report: &DashboardReport) {
    println!("PREVIEW ({} of max {} rows)", report.preview.rows.len(), report.preview.max_rows);
    println!("{}", "-".repeat(40));

    let header: Vec<String> = report
        .preview
        .columns
        .iter()
        .map(|c| format!("{:<14}", truncate_str(c, 13)))
        .collect();
    println!("  {}", header.join(" "));

    for row in &report.preview.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|v| format!("{:<14}", truncate_str(&cell_text(v), 13)))
            .collect();
        println!("  {}", cells.join(" "));
    }
    println!();
}

fn print_profiles(report: &DashboardReport) {
    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<12} {:<12} {:<10} {:<10}",
        "Column", "Type", "Kind", "Missing", "Missing %"
    );
    println!("{}", "-".repeat(70));

    for col in &report.column_profiles {
        println!(
            "{:<20} {:<12} {:<12} {:<10} {:<10.1}",
            truncate_str(&col.name, 19),
            truncate_str(&col.dtype, 11),
            col.kind,
            col.missing_count,
            col.missing_percentage
        );
    }
    println!();
}

fn print_describe(describe: &DescribeTable) {
    println!("DESCRIPTIVE STATISTICS");
    println!("{}", "-".repeat(40));

    if describe.columns.is_empty() {
        println!("  No numeric columns");
        println!();
        return;
    }

    if describe.transposed {
        let labels: Vec<&str> = DescriptiveStats::default()
            .rows()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        println!(
            "{:<20} {}",
            "Column",
            labels
                .iter()
                .map(|l| format!("{:>11}", l))
                .collect::<Vec<_>>()
                .join(" ")
        );
        for column in &describe.columns {
            let values: Vec<String> = column
                .stats
                .rows()
                .into_iter()
                .map(|(_, v)| format!("{:>11}", format_stat(v)))
                .collect();
            println!("{:<20} {}", truncate_str(&column.name, 19), values.join(" "));
        }
    } else {
        let names: Vec<String> = describe
            .columns
            .iter()
            .map(|c| format!("{:>14}", truncate_str(&c.name, 13)))
            .collect();
        println!("{:<10} {}", "", names.join(" "));

        let columns: Vec<Vec<(&str, Option<f64>)>> =
            describe.columns.iter().map(|c| c.stats.rows()).collect();
        let row_count = columns.first().map_or(0, Vec::len);
        for row in 0..row_count {
            let values: Vec<String> = columns
                .iter()
                .map(|c| format!("{:>14}", format_stat(c[row].1)))
                .collect();
            println!("{:<10} {}", columns[0][row].0, values.join(" "));
        }
    }
    println!();
}

fn print_univariate(report: &DashboardReport) {
    println!("UNIVARIATE ANALYSIS");
    println!("{}", "-".repeat(40));

    let Some(ref univariate) = report.univariate else {
        println!("  No numeric column to analyse");
        println!();
        return;
    };

    println!("  Column: {}", univariate.column);
    println!("  Distinct values: {}", univariate.distinct_count);
    for (label, value) in univariate.stats.rows() {
        println!("  {:<10} {}", label, format_stat(value));
    }
    println!();

    let histogram = &univariate.histogram;
    println!("  Histogram ({} bins, empty bins hidden)", histogram.counts.len());
    let peak = histogram.counts.iter().copied().max().unwrap_or(0).max(1);
    for bin in histogram.bins().filter(|b| b.count > 0) {
        let width = (bin.count * 40).div_ceil(peak);
        println!(
            "  [{:>12.4}, {:>12.4}) {:>6} {}",
            bin.start,
            bin.end,
            bin.count,
            "#".repeat(width)
        );
    }
    println!();
}

fn print_aggregate(report: &DashboardReport) {
    let Some(ref aggregate) = report.aggregate else {
        return;
    };

    println!("AGGREGATE: {}", aggregate.op.label().to_uppercase());
    println!("{}", "-".repeat(40));
    for value in &aggregate.values {
        println!("  {:<20} {}", truncate_str(&value.name, 19), format_stat(value.value));
    }
    println!();
}

fn print_missing(report: &DashboardReport) {
    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));

    if report.missing.is_empty() {
        println!("  No missing values found");
    } else {
        for col in &report.missing {
            println!(
                "  {:<20} {:>8} ({:.1}%)",
                truncate_str(&col.name, 19),
                col.missing_count,
                col.missing_percentage
            );
        }
    }
    println!();
}

fn print_imputation(report: &DashboardReport) {
    let summary = &report.imputation;

    println!(
        "IMPUTATION ({} fill, threshold {:.1}%)",
        summary.method, summary.threshold_percent
    );
    println!("{}", "-".repeat(40));

    if summary.columns.is_empty() {
        println!("  No numeric columns within the threshold");
    } else {
        for column in &summary.columns {
            println!(
                "  {:<20} fill {:<14} {} filled",
                truncate_str(&column.name, 19),
                format_stat(column.fill_value),
                column.filled_count
            );
        }
    }

    for name in &summary.unfilled {
        warn!("Column '{}' left unfilled", name);
        println!("  ! {} has no values to fill from", name);
    }
    println!();
}

/// Format an optional statistic for display.
fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}

/// Display text of a preview cell.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
