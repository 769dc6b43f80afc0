//! Aggregations feeding the trend chart, the cause pie and the incident map.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use geo::{BoundingRect, MultiPoint, Point, Rect};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    dataset::Incidents,
    lookup::LookupKind,
    normalize::coerce::to_float,
    schema::{CAUSA, LAT, LNG, MUNICIPIO, SUPERFICIE},
};

/// Hard cap on points handed to a map renderer.
pub const MAX_MAP_POINTS: usize = 2000;

/// Fallback map center (lng, lat): central Spain.
const DEFAULT_CENTER: (f64, f64) = (-3.7, 40.4);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub incidents: usize,
    /// Burned area summed over the year; missing areas count as zero.
    pub hectares: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseShare {
    pub cause: String,
    pub incidents: usize,
    /// Fraction of all incidents, in `[0, 1]`.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    /// x = longitude, y = latitude.
    pub location: Point<f64>,
    pub hectares: Option<f64>,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Point<f64>,
    pub bounds: Option<Rect<f64>>,
}

fn float_column(incidents: &Incidents, name: &str) -> Result<Vec<Option<f64>>> {
    match incidents.frame().column(name) {
        Ok(column) => Ok(to_float(column)?.f64()?.into_iter().collect()),
        Err(_) => Ok(vec![None; incidents.len()]),
    }
}

/// Burned hectares and incident counts per year, ascending. Rows without a
/// parsed date are left out; a table without a time index yields nothing.
pub fn yearly_area(incidents: &Incidents) -> Result<Vec<YearTotal>> {
    if incidents.time_index().is_none() {
        return Ok(Vec::new());
    }

    let mut totals = BTreeMap::<i32, (usize, f64)>::new();
    for (year, area) in incidents.years()?.into_iter().zip(float_column(incidents, SUPERFICIE)?) {
        let Some(year) = year else { continue };
        let entry = totals.entry(year).or_default();
        entry.0 += 1;
        entry.1 += area.unwrap_or(0.0);
    }

    Ok(totals.into_iter()
        .map(|(year, (incidents, hectares))| YearTotal { year, incidents, hectares })
        .collect())
}

/// Incident count per cause, most frequent first (ties by name). Uses the
/// translated label when the cause lookup was applied.
pub fn cause_distribution(incidents: &Incidents) -> Result<Vec<CauseShare>> {
    let causes = match incidents.text_column(LookupKind::Cause.label_column())? {
        Some(labels) => labels,
        None => incidents.text_column(CAUSA)?.unwrap_or_default(),
    };

    let mut counts = HashMap::<String, usize>::new();
    for cause in causes.into_iter().flatten() {
        *counts.entry(cause).or_default() += 1;
    }

    let total = counts.values().sum::<usize>();
    let mut shares = counts.into_iter()
        .map(|(cause, count)| CauseShare { cause, incidents: count, share: count as f64 / total as f64 })
        .collect::<Vec<_>>();
    shares.sort_by(|a, b| b.incidents.cmp(&a.incidents).then_with(|| a.cause.cmp(&b.cause)));
    Ok(shares)
}

fn format_hectares(hectares: Option<f64>) -> String {
    match hectares {
        Some(ha) => format!("{ha} ha"),
        None => "? ha".to_string(),
    }
}

/// The first `limit` incidents (at most [`MAX_MAP_POINTS`]) as map markers.
pub fn map_points(incidents: &Incidents, limit: usize) -> Result<Vec<MapPoint>> {
    if !incidents.is_mappable() {
        return Ok(Vec::new());
    }
    let limit = limit.min(MAX_MAP_POINTS).min(incidents.len());

    let lats = float_column(incidents, LAT)?;
    let lngs = float_column(incidents, LNG)?;
    let areas = float_column(incidents, SUPERFICIE)?;
    let towns = incidents.text_column(MUNICIPIO)?.unwrap_or_else(|| vec![None; incidents.len()]);

    Ok(lats.into_iter().zip(lngs).zip(areas).zip(towns)
        .filter_map(|(((lat, lng), hectares), town)| {
            let popup = format!("{} - {}", town.as_deref().unwrap_or("Sin municipio"), format_hectares(hectares));
            Some(MapPoint { location: Point::new(lng?, lat?), hectares, popup })
        })
        .take(limit)
        .collect())
}

/// GeoJSON FeatureCollection of map points.
pub fn points_to_geojson(points: &[MapPoint]) -> Value {
    let features = points.iter()
        .map(|point| json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [point.location.x(), point.location.y()] },
            "properties": { "popup": point.popup, "superficie": point.hectares },
        }))
        .collect::<Vec<_>>();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Bounds of the points and their center; central Spain when there are none.
pub fn map_view(points: &[MapPoint]) -> MapView {
    let bounds = MultiPoint::new(points.iter().map(|point| point.location).collect()).bounding_rect();
    let center = bounds.map(|rect| Point::from(rect.center()))
        .unwrap_or_else(|| Point::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1));
    MapView { center, bounds }
}
