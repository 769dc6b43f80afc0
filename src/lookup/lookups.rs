use std::{collections::HashMap, ffi::OsStr, path::Path};

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    common::require_file_exists,
    io::{csv::read_csv, sheet::{read_workbook, Sheet}},
};
use super::LookupKind;

/// Canonical text form of a code: trimmed, integral numbers without a
/// fractional part (`"03"`, `"3"` and `"3.0"` all become `"3"`).
pub fn normalize_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() { return None; }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
            Some(format!("{}", value as i64))
        }
        _ => Some(raw.to_string()),
    }
}

/// A single code -> label mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    kind: LookupKind,
    labels: HashMap<String, String>,
}

impl Lookup {
    pub fn new(kind: LookupKind) -> Self {
        Self { kind, labels: HashMap::new() }
    }

    /// Build from (code, label) pairs; codes are normalized, blank entries skipped.
    pub fn from_pairs<C, L>(kind: LookupKind, pairs: impl IntoIterator<Item = (C, L)>) -> Self
    where
        C: AsRef<str>,
        L: AsRef<str>,
    {
        let labels = pairs.into_iter()
            .filter_map(|(code, label)| {
                let code = normalize_code(code.as_ref())?;
                let label = label.as_ref().trim();
                (!label.is_empty()).then(|| (code, label.to_string()))
            })
            .collect();
        Self { kind, labels }
    }

    pub fn kind(&self) -> LookupKind { self.kind }

    pub fn len(&self) -> usize { self.labels.len() }

    pub fn is_empty(&self) -> bool { self.labels.is_empty() }

    /// Label for `code`, if mapped.
    pub fn get(&self, code: &str) -> Option<&str> {
        self.labels.get(&normalize_code(code)?).map(String::as_str)
    }

    /// Label for `code`, falling back to the sentinel of this lookup kind.
    pub fn label(&self, code: Option<&str>) -> &str {
        code.and_then(|code| self.get(code))
            .unwrap_or(self.kind.default_label())
    }
}

/// Up to three independent lookups (region, province, cause).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookups {
    tables: HashMap<LookupKind, Lookup>,
}

impl Lookups {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, lookup: Lookup) {
        self.tables.insert(lookup.kind(), lookup);
    }

    pub fn get(&self, kind: LookupKind) -> Option<&Lookup> {
        self.tables.get(&kind)
    }

    pub fn len(&self) -> usize { self.tables.len() }

    pub fn is_empty(&self) -> bool { self.tables.is_empty() }

    /// Reads lookups from a workbook (xls, xlsx, xlsb, ods) or a CSV file.
    ///
    /// A lookup is built for each column pair found in any sheet; pairs that
    /// appear nowhere are omitted rather than reported as errors.
    pub fn read(path: &Path) -> Result<Self> {
        require_file_exists(path)?;

        let is_csv = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new("csv")));
        let sheets = if is_csv {
            let name = path.file_name().and_then(OsStr::to_str).unwrap_or("lookup.csv");
            vec![Sheet::from_frame(name, &read_csv(path)?)?]
        } else {
            read_workbook(path)?
        };

        let lookups = Self::from_sheets(&sheets);
        if lookups.is_empty() {
            warn!("[lookup] no lookup column pairs found in {}", path.display());
        }
        Ok(lookups)
    }

    pub(crate) fn from_sheets(sheets: &[Sheet]) -> Self {
        let mut lookups = Self::new();
        for kind in LookupKind::order() {
            let (code_col, label_col) = kind.source_columns();
            let found = sheets.iter().find_map(|sheet| {
                Some((sheet, sheet.column(code_col)?, sheet.column(label_col)?))
            });
            let Some((sheet, codes, labels)) = found else { continue };

            let pairs = codes.into_iter().zip(labels)
                .filter_map(|(code, label)| Some((code?, label?)));
            let lookup = Lookup::from_pairs(kind, pairs);
            debug!("[lookup] {} lookup: {} entries from sheet '{}'", kind.to_str(), lookup.len(), sheet.name);
            lookups.insert(lookup);
        }
        lookups
    }
}
