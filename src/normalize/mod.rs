//! Normalization of raw incident tables into canonical columns and types.
//!
//! Null policy: a value that fails to parse becomes a null cell and the row
//! is kept. The one exception is the pair of coordinate columns: a row whose
//! latitude or longitude is missing or unparseable cannot be placed on a map
//! and is dropped. Dates that fail to parse leave the row in place but out of
//! every time-based view.

pub(crate) mod coerce;

use anyhow::Result;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::{
    lookup::{LookupKind, Lookups},
    schema::{detect_in, ColumnAliases, CAUSA, FECHA, IDCOMUNIDAD, IDPROVINCIA, LAT, LNG, SUPERFICIE},
};
use coerce::{text_values, to_code, to_float, to_timestamp};

/// Cause assigned to every row when no cause column can be detected.
pub const DEFAULT_CAUSE: &str = "Desconocida";

/// Normalize a raw incident table.
///
/// Detected columns are coerced and renamed to their canonical names
/// (`lat`, `lng`, `fecha`, `superficie`, `causa`, `idcomunidad`,
/// `idprovincia`); `fecha` becomes the leading, ascending time index.
/// When `lookups` are given, codes are translated into label columns.
/// Applying this to an already normalized table changes nothing.
pub fn normalize(df: DataFrame, aliases: &ColumnAliases, lookups: Option<&Lookups>) -> Result<DataFrame> {
    let mut df = normalize_coordinates(df, aliases)?;
    normalize_area(&mut df, aliases)?;
    let cause_detected = normalize_cause(&mut df, aliases)?;
    normalize_codes(&mut df, aliases)?;
    coerce_numeric(&mut df, aliases)?;
    if let Some(lookups) = lookups {
        apply_lookups(&mut df, lookups, cause_detected)?;
    }
    normalize_time_index(df, aliases)
}

/// Rename `from` to `to`, replacing any stale column already called `to`.
fn rename_column(df: &mut DataFrame, from: &str, to: &str) -> Result<()> {
    if from == to { return Ok(()); }
    if df.get_column_index(to).is_some() {
        df.drop_in_place(to)?;
    }
    df.rename(from, to.into())?;
    Ok(())
}

fn normalize_coordinates(mut df: DataFrame, aliases: &ColumnAliases) -> Result<DataFrame> {
    let (Some(lat), Some(lng)) = (detect_in(&df, &aliases.lat), detect_in(&df, &aliases.lng)) else {
        warn!("[normalize] no latitude/longitude columns detected; table is not mappable");
        return Ok(df);
    };
    debug!("[normalize] coordinates: {lat} -> {LAT}, {lng} -> {LNG}");

    let lat_values = to_float(df.column(lat)?)?;
    let lng_values = to_float(df.column(lng)?)?;
    let keep: BooleanChunked = lat_values.f64()?.into_iter()
        .zip(lng_values.f64()?.into_iter())
        .map(|(lat, lng)| lat.is_some() && lng.is_some())
        .collect();

    df.replace_or_add(lat.into(), lat_values)?;
    df.replace_or_add(lng.into(), lng_values)?;

    let before = df.height();
    let mut df = df.filter(&keep)?;
    if df.height() < before {
        debug!("[normalize] dropped {} rows without coordinates", before - df.height());
    }

    rename_column(&mut df, lat, LAT)?;
    rename_column(&mut df, lng, LNG)?;
    Ok(df)
}

fn normalize_area(df: &mut DataFrame, aliases: &ColumnAliases) -> Result<()> {
    let Some(area) = detect_in(df, &aliases.superficie) else {
        debug!("[normalize] no burned area column detected");
        return Ok(());
    };
    let values = to_float(df.column(area)?)?;
    df.replace_or_add(area.into(), values)?;
    rename_column(df, area, SUPERFICIE)
}

/// Returns `false` when the cause column had to be synthesized.
fn normalize_cause(df: &mut DataFrame, aliases: &ColumnAliases) -> Result<bool> {
    match detect_in(df, &aliases.causa) {
        Some(cause) => {
            rename_column(df, cause, CAUSA)?;
            Ok(true)
        }
        None => {
            debug!("[normalize] no cause column detected; defaulting to '{DEFAULT_CAUSE}'");
            let default = Series::new(CAUSA.into(), vec![DEFAULT_CAUSE; df.height()]);
            df.with_column(default)?;
            Ok(false)
        }
    }
}

fn normalize_codes(df: &mut DataFrame, aliases: &ColumnAliases) -> Result<()> {
    for (candidates, canonical) in [(&aliases.idcomunidad, IDCOMUNIDAD), (&aliases.idprovincia, IDPROVINCIA)] {
        let Some(code) = detect_in(df, candidates) else { continue };
        let values = to_code(df.column(code)?)?;
        df.replace_or_add(code.into(), values)?;
        rename_column(df, code, canonical)?;
    }
    Ok(())
}

fn coerce_numeric(df: &mut DataFrame, aliases: &ColumnAliases) -> Result<()> {
    for name in &aliases.numeric {
        let Ok(column) = df.column(name) else { continue };
        let values = to_float(column)?;
        df.replace_or_add(name.as_str().into(), values)?;
    }
    Ok(())
}

fn apply_lookups(df: &mut DataFrame, lookups: &Lookups, cause_detected: bool) -> Result<()> {
    for kind in LookupKind::order() {
        // A synthesized cause carries no code to translate.
        if kind == LookupKind::Cause && !cause_detected { continue; }
        let Some(lookup) = lookups.get(kind) else { continue };
        let Ok(codes) = df.column(kind.code_column()) else { continue };

        let codes = text_values(codes)?;
        let labels = codes.iter().map(|code| lookup.label(code.as_deref())).collect::<Vec<_>>();
        let unmapped = labels.iter().filter(|&&label| label == kind.default_label()).count();
        if unmapped > 0 {
            debug!("[normalize] {unmapped} rows with unmapped {} codes", kind.to_str());
        }
        df.replace_or_add(kind.label_column().into(), Series::new(kind.label_column().into(), labels))?;
    }
    Ok(())
}

fn normalize_time_index(mut df: DataFrame, aliases: &ColumnAliases) -> Result<DataFrame> {
    let Some(time) = detect_in(&df, &aliases.fecha) else {
        debug!("[normalize] no date column detected; table has no time index");
        return Ok(df);
    };

    let parsed = to_timestamp(df.column(time)?)?;
    let unparsed = parsed.null_count().saturating_sub(df.column(time)?.null_count());
    if unparsed > 0 {
        warn!("[normalize] {unparsed} values in '{time}' could not be parsed as dates");
    }
    df.replace_or_add(time.into(), parsed)?;
    rename_column(&mut df, time, FECHA)?;

    let order = std::iter::once(FECHA.to_string())
        .chain(df.get_column_names().into_iter()
            .filter(|name| name.as_str() != FECHA)
            .map(|name| name.to_string()))
        .collect::<Vec<_>>();
    let df = df.select(order)?;

    let options = SortMultipleOptions::default()
        .with_nulls_last(true)
        .with_maintain_order(true);
    Ok(df.sort([FECHA], options)?)
}

#[cfg(test)]
mod tests {
    use polars::df;

    use super::*;
    use crate::lookup::Lookup;

    fn f64s(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    fn strs(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        text_values(df.column(name).unwrap()).unwrap()
    }

    fn raw() -> DataFrame {
        df!(
            "Latitud" => ["40.1", "", "41.5", "bad", "39.0"],
            "Longitud" => [Some(-3.6), Some(-4.0), Some(-2.0), Some(-1.0), None],
            "Fecha" => ["2021-07-01", "2020-01-01", "not-a-date", "2019-01-01", "2018-01-01"],
            "ha" => ["12.5", "3", "x", "1", "2"],
        ).unwrap()
    }

    #[test]
    fn normalizes_a_single_row() {
        let raw = df!(
            "Latitud" => [40.1],
            "Longitud" => [-3.6],
            "Fecha" => ["2020-05-01"],
            "ha" => [12.5],
        ).unwrap();
        let df = normalize(raw, &ColumnAliases::default(), None).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(f64s(&df, LAT), vec![Some(40.1)]);
        assert_eq!(f64s(&df, LNG), vec![Some(-3.6)]);
        assert_eq!(f64s(&df, SUPERFICIE), vec![Some(12.5)]);
        assert_eq!(strs(&df, CAUSA), vec![Some(DEFAULT_CAUSE.to_string())]);
        assert_eq!(df.get_column_names()[0].as_str(), FECHA);
        assert_eq!(strs(&df, FECHA)[0].as_deref().map(|s| &s[..10]), Some("2020-05-01"));
    }

    #[test]
    fn drops_rows_without_coordinates_only() {
        let df = normalize(raw(), &ColumnAliases::default(), None).unwrap();

        // Rows 2 (empty lat), 4 (bad lat) and 5 (null lng) are gone.
        assert_eq!(df.height(), 2);
        assert_eq!(df.column(LAT).unwrap().null_count(), 0);
        assert_eq!(df.column(LNG).unwrap().null_count(), 0);

        // Unparseable date and area stay as nulls; null dates sort last.
        assert_eq!(f64s(&df, LAT), vec![Some(40.1), Some(41.5)]);
        assert_eq!(df.column(FECHA).unwrap().null_count(), 1);
        assert_eq!(f64s(&df, SUPERFICIE), vec![Some(12.5), None]);
    }

    #[test]
    fn sorts_by_time_index() {
        let raw = df!(
            "lat" => [1.0, 2.0, 3.0],
            "lng" => [1.0, 2.0, 3.0],
            "date" => ["2022-01-01", "2020-01-01", "2021-01-01"],
        ).unwrap();
        let df = normalize(raw, &ColumnAliases::default(), None).unwrap();
        assert_eq!(f64s(&df, LAT), vec![Some(2.0), Some(3.0), Some(1.0)]);
        assert!(df.column("date").is_err());
    }

    #[test]
    fn default_cause_when_missing() {
        let df = normalize(raw(), &ColumnAliases::default(), None).unwrap();
        assert!(strs(&df, CAUSA).iter().all(|c| c.as_deref() == Some(DEFAULT_CAUSE)));
    }

    #[test]
    fn detected_cause_is_renamed() {
        let raw = df!("lat" => [1.0, 2.0], "lng" => [1.0, 2.0], "idcausa" => [1i64, 4]).unwrap();
        let df = normalize(raw, &ColumnAliases::default(), None).unwrap();
        assert_eq!(strs(&df, CAUSA), vec![Some("1".to_string()), Some("4".to_string())]);
        assert!(df.column("idcausa").is_err());
    }

    #[test]
    fn idempotent() {
        let aliases = ColumnAliases::default();
        let once = normalize(raw(), &aliases, None).unwrap();
        let twice = normalize(once.clone(), &aliases, None).unwrap();
        assert!(once.equals_missing(&twice));
        assert_eq!(once.get_column_names(), twice.get_column_names());
    }

    #[test]
    fn idempotent_with_lookups() {
        let aliases = ColumnAliases::default();
        let mut lookups = Lookups::new();
        lookups.insert(Lookup::from_pairs(LookupKind::Cause, [("1", "Rayo")]));
        let raw = df!("lat" => [1.0, 2.0], "lng" => [1.0, 2.0], "causa" => [1i64, 2]).unwrap();

        let once = normalize(raw, &aliases, Some(&lookups)).unwrap();
        let twice = normalize(once.clone(), &aliases, Some(&lookups)).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn lookups_translate_codes() {
        let mut lookups = Lookups::new();
        lookups.insert(Lookup::from_pairs(LookupKind::Cause, [("1", "Rayo"), ("2", "Negligencia")]));
        lookups.insert(Lookup::from_pairs(LookupKind::Province, [("28", "Madrid")]));

        let raw = df!(
            "lat" => [1.0, 2.0, 3.0],
            "lng" => [1.0, 2.0, 3.0],
            "causa" => [1i64, 9, 2],
            "IdProvincia" => ["28", "28.0", "5"],
            "idcomunidad" => [13i64, 13, 13],
        ).unwrap();
        let df = normalize(raw, &ColumnAliases::default(), Some(&lookups)).unwrap();

        assert_eq!(strs(&df, "causa_texto"), vec![Some("Rayo".into()), Some("No especificado".into()), Some("Negligencia".into())]);
        assert_eq!(strs(&df, "provincia"), vec![Some("Madrid".into()), Some("Madrid".into()), Some("Desconocido".into())]);
        assert_eq!(df.column(IDPROVINCIA).unwrap().dtype(), &DataType::Int64);
        // No region lookup was supplied, so no label column appears.
        assert!(df.column("comunidad").is_err());
    }

    #[test]
    fn default_cause_is_not_translated() {
        let mut lookups = Lookups::new();
        lookups.insert(Lookup::from_pairs(LookupKind::Cause, [("1", "Rayo")]));
        let raw = df!("lat" => [1.0], "lng" => [1.0]).unwrap();

        let df = normalize(raw, &ColumnAliases::default(), Some(&lookups)).unwrap();
        assert_eq!(strs(&df, CAUSA), vec![Some(DEFAULT_CAUSE.to_string())]);
        assert!(df.column("causa_texto").is_err());
    }

    #[test]
    fn extra_numeric_columns_coerced_in_place() {
        let raw = df!("lat" => [1.0], "lng" => [1.0], "gastos" => ["1500,75"]).unwrap();
        let df = normalize(raw, &ColumnAliases::default(), None).unwrap();
        assert_eq!(f64s(&df, "gastos"), vec![Some(1500.75)]);
    }

    #[test]
    fn missing_coordinates_degrade_gracefully() {
        let raw = df!("municipio" => ["Ávila"], "ha" => [3.0]).unwrap();
        let df = normalize(raw, &ColumnAliases::default(), None).unwrap();
        assert_eq!(df.height(), 1);
        assert!(df.column(LAT).is_err());
        assert_eq!(f64s(&df, SUPERFICIE), vec![Some(3.0)]);
    }

    #[test]
    fn empty_table() {
        let df = normalize(DataFrame::empty(), &ColumnAliases::default(), None).unwrap();
        assert_eq!(df.height(), 0);
    }
}
