//! CSV reading operations.

use std::{io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvEncoding, CsvReadOptions, CsvReader}};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    read_csv_bytes(&bytes)
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Read DataFrame from CSV bytes.
///
/// A leading UTF-8 byte order mark is dropped, invalid UTF-8 is replaced
/// lossily, and the separator is sniffed from the header line. Every column
/// is read as text; typing is left to `normalize`.
pub(crate) fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let separator = sniff_separator(bytes);

    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po
            .with_separator(separator)
            .with_encoding(CsvEncoding::LossyUtf8));

    CsvReader::new(Cursor::new(bytes))
        .with_options(options)
        .finish()
        .context("[io::csv::read] Failed to read CSV from bytes")
}

/// Spanish exports are frequently `;`-separated; pick whichever of `;` and
/// `,` dominates the header line.
pub(crate) fn sniff_separator(bytes: &[u8]) -> u8 {
    let header = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
    let count = |sep: u8| header.iter().filter(|&&b| b == sep).count();
    if count(b';') > count(b',') { b';' } else { b',' }
}
