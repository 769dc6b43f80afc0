//! Cell-level type coercion. Every parse failure becomes null; nothing here
//! drops rows or raises on bad values.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Day-first for slashed and dashed dates, as Spanish exports use.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%Y%m%d"];

/// Parse a number, accepting a decimal comma. Non-finite values are rejected.
pub(crate) fn parse_f64(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() { return None; }
    raw.parse::<f64>().ok()
        .or_else(|| raw.replace(',', ".").parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parse a date or date-time into milliseconds since the Unix epoch (UTC).
pub(crate) fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() { return None; }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    DATETIME_FORMATS.iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DATE_FORMATS.iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0)))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Coerce a column to `Float64`; unparseable and non-finite cells become null.
pub(crate) fn to_float(column: &Column) -> Result<Series> {
    let series = column.as_materialized_series();
    let values: Float64Chunked = match series.dtype() {
        DataType::String => series.str()?.into_iter()
            .map(|value| value.and_then(parse_f64))
            .collect(),
        _ => series.cast(&DataType::Float64)?.f64()?.into_iter()
            .map(|value| value.filter(|v| v.is_finite()))
            .collect(),
    };
    Ok(values.with_name(series.name().clone()).into_series())
}

/// Coerce a code column to `Int64`.
///
/// Columns that hold no numeric value at all are label columns in disguise
/// and are returned unchanged.
pub(crate) fn to_code(column: &Column) -> Result<Series> {
    let floats = to_float(column)?;
    let floats = floats.f64()?;
    if floats.null_count() == floats.len() && column.null_count() < column.len() {
        return Ok(column.as_materialized_series().clone());
    }
    let codes: Int64Chunked = floats.into_iter()
        .map(|value| value.filter(|v| v.fract() == 0.0).map(|v| v as i64))
        .collect();
    Ok(codes.with_name(column.name().clone()).into_series())
}

/// Coerce a column to `Datetime[ms]`; unparseable cells become null.
pub(crate) fn to_timestamp(column: &Column) -> Result<Series> {
    let target = DataType::Datetime(TimeUnit::Milliseconds, None);
    let series = column.as_materialized_series();
    match series.dtype() {
        DataType::Datetime(_, _) | DataType::Date => Ok(series.cast(&target)?),
        dtype => {
            let text = if dtype == &DataType::String { series.clone() } else { series.cast(&DataType::String)? };
            let millis: Int64Chunked = text.str()?.into_iter()
                .map(|value| value.and_then(parse_timestamp_ms))
                .collect();
            Ok(millis.with_name(series.name().clone()).into_series().cast(&target)?)
        }
    }
}

/// Column values rendered as text, nulls preserved.
pub(crate) fn text_values(column: &Column) -> Result<Vec<Option<String>>> {
    let text = column.cast(&DataType::String)?;
    Ok(text.str()?.into_iter().map(|value| value.map(str::to_string)).collect())
}

/// Milliseconds since the epoch for a `Datetime` column (any time unit).
pub(crate) fn timestamp_values(column: &Column) -> Result<Vec<Option<i64>>> {
    let millis = to_timestamp(column)?.cast(&DataType::Int64)?;
    Ok(millis.i64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ms(y: i32, m: u32, d: u32) -> i64 {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_f64("12.5"), Some(12.5));
        assert_eq!(parse_f64(" 12,5 "), Some(12.5));
        assert_eq!(parse_f64("-3.6"), Some(-3.6));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("n/a"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
    }

    #[test]
    fn parses_dates() {
        assert_eq!(parse_timestamp_ms("2020-05-01"), Some(ms(2020, 5, 1)));
        assert_eq!(parse_timestamp_ms("01/05/2020"), Some(ms(2020, 5, 1)));
        assert_eq!(parse_timestamp_ms("2020-05-01 00:00:00"), Some(ms(2020, 5, 1)));
        assert_eq!(parse_timestamp_ms("2020-05-01T00:00:00Z"), Some(ms(2020, 5, 1)));
        assert_eq!(parse_timestamp_ms("2020-05-01 12:30"), Some(ms(2020, 5, 1) + 45_000_000));
        assert_eq!(parse_timestamp_ms("not a date"), None);
        assert_eq!(parse_timestamp_ms("2020-13-45"), None);
    }

    #[test]
    fn float_coercion_nulls_failures() {
        let column = Column::new("ha".into(), ["12.5", "abc", "", "3,25"]);
        let floats = to_float(&column).unwrap();
        assert_eq!(floats.name().as_str(), "ha");
        assert_eq!(floats.f64().unwrap().into_iter().collect::<Vec<_>>(), vec![Some(12.5), None, None, Some(3.25)]);

        let column = Column::new("n".into(), [Some(1i64), None, Some(3)]);
        let floats = to_float(&column).unwrap();
        assert_eq!(floats.f64().unwrap().into_iter().collect::<Vec<_>>(), vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn code_coercion() {
        let column = Column::new("idprovincia".into(), ["28", "8.0", "x"]);
        let codes = to_code(&column).unwrap();
        assert_eq!(codes.i64().unwrap().into_iter().collect::<Vec<_>>(), vec![Some(28), Some(8), None]);

        let labels = Column::new("idprovincia".into(), ["Madrid", "Barcelona"]);
        assert_eq!(to_code(&labels).unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn timestamp_coercion_keeps_rows() {
        let column = Column::new("Fecha".into(), ["2020-05-01", "garbage", "02/06/2021"]);
        let parsed = to_timestamp(&column).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.null_count(), 1);
        assert!(matches!(parsed.dtype(), DataType::Datetime(TimeUnit::Milliseconds, None)));

        let values = timestamp_values(&parsed.into_column()).unwrap();
        assert_eq!(values, vec![Some(ms(2020, 5, 1)), None, Some(ms(2021, 6, 2))]);
    }
}
