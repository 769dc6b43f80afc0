use std::{collections::BTreeSet, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use polars::{frame::DataFrame, prelude::DataType};
use tracing::{info, warn};

use crate::{
    io::{archive::read_csv_from_zip_bytes, csv::{write_csv, write_csv_string}},
    lookup::{normalize_code, Lookups},
    normalize::{coerce::{text_values, timestamp_values}, normalize},
    schema::{ColumnAliases, FECHA, LAT, LNG},
    source::ArchiveSource,
};

/// An immutable, normalized table of wildfire incidents.
#[derive(Debug, Clone)]
pub struct Incidents {
    frame: DataFrame,
}

impl Default for Incidents {
    fn default() -> Self { Self::empty() }
}

impl Incidents {
    /// Wrap an already normalized DataFrame.
    pub fn new(frame: DataFrame) -> Self { Self { frame } }

    pub fn empty() -> Self { Self { frame: DataFrame::empty() } }

    pub fn frame(&self) -> &DataFrame { &self.frame }

    pub fn into_frame(self) -> DataFrame { self.frame }

    pub fn len(&self) -> usize { self.frame.height() }

    pub fn is_empty(&self) -> bool { self.frame.height() == 0 }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame.get_column_names().into_iter().map(|name| name.to_string()).collect()
    }

    /// True when canonical coordinates are present.
    pub fn is_mappable(&self) -> bool {
        self.has_column(LAT) && self.has_column(LNG)
    }

    /// Name of the time index column, if the table has one.
    pub fn time_index(&self) -> Option<&'static str> {
        let column = self.frame.column(FECHA).ok()?;
        matches!(column.dtype(), DataType::Datetime(_, _)).then_some(FECHA)
    }

    /// Per-row timestamps in milliseconds since the epoch; all null without a time index.
    pub fn timestamps(&self) -> Result<Vec<Option<i64>>> {
        match self.time_index() {
            Some(index) => timestamp_values(self.frame.column(index)?),
            None => Ok(vec![None; self.len()]),
        }
    }

    /// Per-row calendar year from the time index.
    pub fn years(&self) -> Result<Vec<Option<i32>>> {
        Ok(self.timestamps()?.into_iter()
            .map(|ms| ms.and_then(DateTime::<Utc>::from_timestamp_millis).map(|dt| dt.year()))
            .collect())
    }

    /// Distinct years present, ascending.
    pub fn distinct_years(&self) -> Result<Vec<i32>> {
        Ok(self.years()?.into_iter().flatten().collect::<BTreeSet<_>>().into_iter().collect())
    }

    /// Earliest and latest parsed timestamps.
    pub fn time_range(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime)>> {
        let stamps = self.timestamps()?.into_iter().flatten().collect::<Vec<_>>();
        let (Some(&min), Some(&max)) = (stamps.iter().min(), stamps.iter().max()) else {
            return Ok(None);
        };
        let to_naive = |ms: i64| DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.naive_utc());
        Ok(to_naive(min).zip(to_naive(max)))
    }

    /// Per-row values of `column` as text; `None` if the column is absent.
    pub fn text_column(&self, column: &str) -> Result<Option<Vec<Option<String>>>> {
        match self.frame.column(column) {
            Ok(values) => Ok(Some(text_values(values)?)),
            Err(_) => Ok(None),
        }
    }

    /// Distinct non-null values of `column`, sorted. Numeric codes are
    /// rendered in their canonical form.
    pub fn distinct(&self, column: &str) -> Result<Vec<String>> {
        let values = self.text_column(column)?.unwrap_or_default();
        Ok(values.iter()
            .filter_map(|value| value.as_deref().and_then(normalize_code))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_csv(&mut self.frame.clone(), path)
    }

    pub fn to_csv_string(&self) -> Result<String> {
        write_csv_string(&mut self.frame.clone())
    }
}

/// Load and normalize the incident table held by `source`.
///
/// A missing or unreadable archive is an error. An archive without a CSV
/// entry is reported and yields an empty table.
pub fn load_incidents(source: &dyn ArchiveSource, lookups: Option<&Lookups>, aliases: &ColumnAliases) -> Result<Incidents> {
    let bytes = source.bytes()?;
    load_from_bytes(source.name(), &bytes, lookups, aliases)
}

pub(crate) fn load_from_bytes(name: &str, bytes: &[u8], lookups: Option<&Lookups>, aliases: &ColumnAliases) -> Result<Incidents> {
    let Some((entry, raw)) = read_csv_from_zip_bytes(bytes, name)? else {
        warn!("[dataset] no CSV entry found in {name}");
        return Ok(Incidents::empty());
    };

    let rows = raw.height();
    let frame = normalize(raw, aliases, lookups)
        .with_context(|| format!("[dataset] Failed to normalize {entry} from {name}"))?;
    info!("[dataset] loaded {} of {rows} rows from {name}:{entry}", frame.height());
    Ok(Incidents::new(frame))
}
