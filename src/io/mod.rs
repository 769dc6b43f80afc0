//! IO module for format-specific reading and writing operations.
//!
//! Each format module handles a single file format, independent of the
//! incident domain types that consume the resulting tables.
//!
//! # Format Modules
//!
//! - `csv` - CSV format for incident tables and plain-text lookups
//! - `archive` - Zip archives wrapping the incident CSV
//! - `sheet` - Spreadsheet workbooks (xls, xlsx, ods) holding lookup tables

pub(crate) mod archive;
pub(crate) mod csv;
pub(crate) mod sheet;
