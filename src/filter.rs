use std::collections::HashSet;

use anyhow::Result;
use polars::prelude::BooleanChunked;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Incidents,
    lookup::{normalize_code, LookupKind},
    schema::SUPERFICIE,
};

/// Row selection over a normalized incident table.
///
/// Empty lists and `None` bounds leave that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentFilter {
    /// Inclusive year range over the time index.
    pub years: Option<(i32, i32)>,
    /// Region labels, or codes when the table has no region labels.
    pub regions: Vec<String>,
    /// Province labels, or codes when the table has no province labels.
    pub provinces: Vec<String>,
    /// Cause labels (`causa_texto`) or raw `causa` values.
    pub causes: Vec<String>,
    /// Minimum burned area in hectares.
    pub min_area: Option<f64>,
}

impl IncidentFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Rows matching every constraint. Rows with a null value in a
    /// constrained dimension never match.
    pub fn apply(&self, incidents: &Incidents) -> Result<Incidents> {
        if self.is_empty() {
            return Ok(incidents.clone());
        }

        let mut keep = vec![true; incidents.len()];

        if let Some((from, to)) = self.years {
            for (keep, year) in keep.iter_mut().zip(incidents.years()?) {
                *keep &= year.is_some_and(|year| (from..=to).contains(&year));
            }
        }

        retain_matching(&mut keep, incidents, LookupKind::Region, &self.regions)?;
        retain_matching(&mut keep, incidents, LookupKind::Province, &self.provinces)?;
        retain_matching(&mut keep, incidents, LookupKind::Cause, &self.causes)?;

        if let Some(min_area) = self.min_area {
            let areas = match incidents.frame().column(SUPERFICIE) {
                Ok(column) => crate::normalize::coerce::to_float(column)?.f64()?.into_iter().collect(),
                Err(_) => vec![None; incidents.len()],
            };
            for (keep, area) in keep.iter_mut().zip(areas) {
                *keep &= area.is_some_and(|area| area >= min_area);
            }
        }

        let mask: BooleanChunked = keep.into_iter().collect();
        Ok(Incidents::new(incidents.frame().filter(&mask)?))
    }
}

/// Keep rows whose label (or code, absent labels) is among `wanted`.
fn retain_matching(keep: &mut [bool], incidents: &Incidents, kind: LookupKind, wanted: &[String]) -> Result<()> {
    if wanted.is_empty() { return Ok(()); }

    let wanted = wanted.iter().filter_map(|value| normalize_code(value)).collect::<HashSet<_>>();
    let values = match incidents.text_column(kind.label_column())? {
        Some(labels) => labels,
        None => incidents.text_column(kind.code_column())?.unwrap_or_else(|| vec![None; keep.len()]),
    };

    for (keep, value) in keep.iter_mut().zip(values) {
        *keep &= value.as_deref().and_then(normalize_code).is_some_and(|value| wanted.contains(&value));
    }
    Ok(())
}
