//! CSV loading.
//!
//! Decodes delimited text into a `DataFrame` with polars' CSV reader,
//! treating the usual spreadsheet/dataframe missing markers as nulls.

use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::config::ProfilerConfig;
use crate::error::{ProfilerError, Result};

/// Strings read as missing values, in any column.
pub const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for a single load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Read at most this many data rows.
    pub row_limit: Option<usize>,
    /// Rows inspected for schema inference; `None` scans every row.
    pub infer_schema_length: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            row_limit: None,
            infer_schema_length: None,
        }
    }
}

impl From<&ProfilerConfig> for LoadOptions {
    fn from(config: &ProfilerConfig) -> Self {
        Self {
            row_limit: config.row_limit,
            infer_schema_length: config.infer_schema_length,
        }
    }
}

/// Load a CSV file from disk.
pub fn load_csv_path(path: impl AsRef<Path>, options: LoadOptions) -> Result<DataFrame> {
    let path = path.as_ref();
    info!("Loading dataset from: {}", path.display());
    let bytes = std::fs::read(path)?;
    load_csv_bytes(&bytes, options)
}

/// Load CSV content already in memory (e.g. an uploaded file).
///
/// Tries standard quote handling first, then a full schema scan when the
/// inference window was bounded, then no quoting, then a pre-cleaned copy of
/// the content.
pub fn load_csv_bytes(bytes: &[u8], options: LoadOptions) -> Result<DataFrame> {
    match read_csv(bytes.to_vec(), options, Some(b'"')) {
        Ok(df) => return finish_load(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // A value past the inference window may not parse as the inferred type
    if options.infer_schema_length.is_some() {
        let full_scan = LoadOptions {
            infer_schema_length: None,
            ..options
        };
        match read_csv(bytes.to_vec(), full_scan, Some(b'"')) {
            Ok(df) => return finish_load(df),
            Err(e) => debug!("Loading with a full schema scan failed: {}", e),
        }
    }

    match read_csv(bytes.to_vec(), options, None) {
        Ok(df) => return finish_load(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    let content = String::from_utf8_lossy(bytes);
    let cleaned = clean_csv_content(&content);
    let df = read_csv(cleaned.into_bytes(), options, Some(b'"'))
        .map_err(|e| ProfilerError::LoadFailed(e.to_string()))?;
    finish_load(df)
}

fn read_csv(bytes: Vec<u8>, options: LoadOptions, quote_char: Option<u8>) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(NA_VALUES.iter().map(|s| (*s).into()).collect());

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_length)
        .with_n_rows(options.row_limit)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(quote_char)
                .with_null_values(Some(null_values)),
        )
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

fn finish_load(df: DataFrame) -> Result<DataFrame> {
    let df = widen_empty_columns(df)?;
    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(df)
}

/// Decode text columns without a single value as Float64.
///
/// Such a column carries no type information; reading it as numeric keeps it
/// eligible for imputation like any other all-missing numeric column.
fn widen_empty_columns(df: DataFrame) -> PolarsResult<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }

    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            if col.dtype() == &DataType::String && col.null_count() == col.len() {
                debug!("Column '{}' has no values; reading it as Float64", col.name());
                col.cast(&DataType::Float64)
            } else {
                Ok(col.clone())
            }
        })
        .collect::<PolarsResult<Vec<_>>>()?;

    DataFrame::new(columns)
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;
    use crate::utils::column_kind;

    const SAMPLE: &str = "a,b,c\n1,x,0.5\n2,y,NA\n,z,1.5\n4,w,nan\n";

    #[test]
    fn test_load_csv_bytes_types_and_nulls() {
        let df = load_csv_bytes(SAMPLE.as_bytes(), LoadOptions::default()).unwrap();

        assert_eq!(df.shape(), (4, 3));
        assert_eq!(column_kind(df.column("a").unwrap().dtype()), ColumnKind::Numeric);
        assert_eq!(column_kind(df.column("b").unwrap().dtype()), ColumnKind::Categorical);
        assert_eq!(column_kind(df.column("c").unwrap().dtype()), ColumnKind::Numeric);
        assert_eq!(df.column("a").unwrap().null_count(), 1);
        assert_eq!(df.column("c").unwrap().null_count(), 2);
    }

    #[test]
    fn test_load_csv_bytes_row_limit() {
        let options = LoadOptions {
            row_limit: Some(2),
            ..Default::default()
        };
        let df = load_csv_bytes(SAMPLE.as_bytes(), options).unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_csv_path("/definitely/not/here.csv", LoadOptions::default()).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_options_from_config() {
        let config = ProfilerConfig::builder()
            .row_limit(42)
            .infer_schema_length(7)
            .build()
            .unwrap();
        let options = LoadOptions::from(&config);
        assert_eq!(options.row_limit, Some(42));
        assert_eq!(options.infer_schema_length, Some(7));
    }

    /// 150 integer rows followed by `last`.
    fn late_type_change(last: &str) -> String {
        let mut csv = String::from("v,w\n");
        for i in 0..150 {
            csv.push_str(&format!("{},{}\n", i, i));
        }
        csv.push_str(&format!("{},150\n", last));
        csv
    }

    #[test]
    fn test_late_float_value_widens_column() {
        let df = load_csv_bytes(late_type_change("2.5").as_bytes(), LoadOptions::default()).unwrap();

        assert_eq!(df.height(), 151);
        let v = df.column("v").unwrap();
        assert_eq!(v.dtype(), &DataType::Float64);
        assert_eq!(v.get(150).unwrap(), AnyValue::Float64(2.5));
        assert_eq!(df.column("w").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_late_text_value_makes_column_categorical() {
        let df = load_csv_bytes(late_type_change("abc").as_bytes(), LoadOptions::default()).unwrap();

        assert_eq!(df.height(), 151);
        assert_eq!(column_kind(df.column("v").unwrap().dtype()), ColumnKind::Categorical);
    }

    #[test]
    fn test_bounded_inference_falls_back_to_full_scan() {
        let options = LoadOptions {
            infer_schema_length: Some(100),
            ..Default::default()
        };
        let df = load_csv_bytes(late_type_change("2.5").as_bytes(), options).unwrap();

        assert_eq!(df.height(), 151);
        assert_eq!(df.column("v").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_boolean_and_empty_columns_are_numeric() {
        let csv = "flag,notes,x\nTrue,,1\nFalse,,2\n";
        let df = load_csv_bytes(csv.as_bytes(), LoadOptions::default()).unwrap();

        let flag = df.column("flag").unwrap();
        assert_eq!(flag.dtype(), &DataType::Boolean);
        assert_eq!(column_kind(flag.dtype()), ColumnKind::Numeric);

        let notes = df.column("notes").unwrap();
        assert_eq!(notes.dtype(), &DataType::Float64);
        assert_eq!(notes.null_count(), 2);
        assert_eq!(column_kind(notes.dtype()), ColumnKind::Numeric);
    }

    #[test]
    fn test_empty_table_keeps_header_types() {
        let df = load_csv_bytes(b"a,b\n", LoadOptions::default()).unwrap();
        assert_eq!(df.shape(), (0, 2));
    }

    #[test]
    fn test_clean_csv_content() {
        let cleaned = clean_csv_content("a,b\n\n\"\"x\"\",1\n   \n");
        assert_eq!(cleaned, "a,b\n\"x\",1");
    }
}
