//! Spreadsheet reading via calamine (xls, xlsx, xlsb, ods).

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::{frame::DataFrame, prelude::DataType};

/// A worksheet flattened to optional text cells, first row taken as header.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    /// Values of the named column, or `None` if the header is absent.
    pub(crate) fn column(&self, header: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter()
            .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
            .collect())
    }

    /// Flatten a Polars DataFrame (e.g. a CSV lookup file) into a sheet.
    pub(crate) fn from_frame(name: &str, df: &DataFrame) -> Result<Self> {
        let headers = df.get_column_names().into_iter().map(|h| h.to_string()).collect::<Vec<_>>();

        let mut rows = vec![Vec::with_capacity(headers.len()); df.height()];
        for column in df.get_columns() {
            let text = column.cast(&DataType::String)?;
            for (row, value) in rows.iter_mut().zip(text.str()?.into_iter()) {
                row.push(value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string));
            }
        }

        Ok(Self { name: name.to_string(), headers, rows })
    }
}

/// Reads every worksheet of the workbook at `path`.
pub(crate) fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("[io::sheet] Failed to open workbook: {}", path.display()))?;

    let names = workbook.sheet_names().to_vec();
    names.iter()
        .map(|name| {
            let range = workbook.worksheet_range(name)
                .with_context(|| format!("[io::sheet] Failed to read sheet '{name}' of {}", path.display()))?;
            Ok(sheet_from_range(name, &range))
        })
        .collect()
}

fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut rows = range.rows();
    let headers = rows.next()
        .map(|header| header.iter().map(|cell| cell_text(cell).unwrap_or_default()).collect())
        .unwrap_or_default();
    let rows = rows.map(|row| row.iter().map(cell_text).collect()).collect();
    Sheet { name: name.to_string(), headers, rows }
}

/// Render a cell as text; integral floats lose their trailing `.0`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}
