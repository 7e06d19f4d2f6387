//! CSV export of result tables.
//!
//! The download link embeds the CSV text inline, as
//! `<a href="data:file/csv;base64,...">Download csv file</a>`, so existing
//! renderers can drop it into a page unchanged.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use polars::prelude::*;
use tracing::info;

use crate::error::Result;

/// Media type tag of the embedded payload.
pub const CSV_MEDIA_TYPE: &str = "file/csv";

/// Serialize a table as CSV text: header row, comma separated, no index,
/// nulls as empty fields. A table without columns serializes to "".
pub fn to_csv_string(df: &DataFrame) -> Result<String> {
    if df.width() == 0 {
        return Ok(String::new());
    }

    let mut buffer: Vec<u8> = Vec::new();
    let mut df = df.clone();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// `data:` URI carrying `csv` as standard base64.
pub fn csv_data_uri(csv: &str) -> String {
    format!("data:{};base64,{}", CSV_MEDIA_TYPE, STANDARD.encode(csv.as_bytes()))
}

/// HTML anchor that downloads `csv` when clicked.
pub fn download_link_for(csv: &str) -> String {
    format!("<a href=\"{}\">Download csv file</a>", csv_data_uri(csv))
}

/// HTML download link for a table.
pub fn download_link(df: &DataFrame) -> Result<String> {
    Ok(download_link_for(&to_csv_string(df)?))
}

/// Write a table as CSV to `path`.
pub fn write_csv(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(to_csv_string(df)?.as_bytes())?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_link_format() {
        // "a\n1\n" in base64
        assert_eq!(
            download_link_for("a\n1\n"),
            "<a href=\"data:file/csv;base64,YQoxCg==\">Download csv file</a>"
        );
    }

    #[test]
    fn test_to_csv_string() {
        let df = df![
            "a" => [Some(1i64), None, Some(3)],
            "b" => ["x", "y", "z"],
        ]
        .unwrap();

        let csv = to_csv_string(&df).unwrap();
        assert_eq!(csv, "a,b\n1,x\n,y\n3,z\n");
    }

    #[test]
    fn test_download_link_roundtrip_payload() {
        let df = df!["v" => [1i64, 2]].unwrap();
        let link = download_link(&df).unwrap();

        let payload = link
            .trim_start_matches("<a href=\"data:file/csv;base64,")
            .trim_end_matches("\">Download csv file</a>");
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "v\n1\n2\n");
    }

    #[test]
    fn test_empty_table() {
        let df = DataFrame::new(Vec::new()).unwrap();
        assert_eq!(to_csv_string(&df).unwrap(), "");
        assert_eq!(
            download_link(&df).unwrap(),
            "<a href=\"data:file/csv;base64,\">Download csv file</a>"
        );
    }

    #[test]
    fn test_write_csv() {
        let dir = std::env::temp_dir().join(format!("lex-exploration-export-{}", std::process::id()));
        let path = dir.join("imputed.csv");
        let df = df!["v" => [1.5f64, 2.5]].unwrap();

        write_csv(&df, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "v\n1.5\n2.5\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
