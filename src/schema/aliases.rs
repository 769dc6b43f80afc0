use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Candidate source column names for each canonical column, in priority order.
///
/// Source exports name the same field inconsistently (`lat`, `Latitud`,
/// `LATITUD`...). The canonical name is always listed first so that an
/// already normalized table resolves to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAliases {
    pub lat: Vec<String>,
    pub lng: Vec<String>,
    pub fecha: Vec<String>,
    pub superficie: Vec<String>,
    pub causa: Vec<String>,
    pub idcomunidad: Vec<String>,
    pub idprovincia: Vec<String>,
    /// Extra numeric columns (costs, losses, casualties) coerced in place, never renamed.
    pub numeric: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            lat: names(&["lat", "latitude", "latitud", "Lat", "LAT", "Latitud", "LATITUD", "Latitude"]),
            lng: names(&["lng", "long", "lon", "longitude", "longitud", "Lng", "Lon", "LNG", "LON", "Longitud", "LONGITUD", "Longitude"]),
            fecha: names(&["fecha", "date", "Fecha", "FECHA", "Date"]),
            superficie: names(&["superficie", "ha", "hectareas", "Superficie", "SUPERFICIE"]),
            causa: names(&["causa", "idcausa", "causa_desc", "Causa", "CAUSA"]),
            idcomunidad: names(&["idcomunidad", "IdComunidad", "IDCOMUNIDAD"]),
            idprovincia: names(&["idprovincia", "IdProvincia", "IDPROVINCIA"]),
            numeric: names(&["gastos", "coste", "perdidas", "muertos", "heridos"]),
        }
    }
}

impl ColumnAliases {
    /// Load aliases from a JSON file; omitted fields keep their defaults.
    pub fn read_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[schema::aliases] Failed to read aliases file: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("[schema::aliases] Invalid aliases file: {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_has_priority() {
        let aliases = ColumnAliases::default();
        assert_eq!(aliases.lat[0], "lat");
        assert_eq!(aliases.lng[0], "lng");
        assert_eq!(aliases.fecha[0], "fecha");
        assert_eq!(aliases.superficie[0], "superficie");
        assert_eq!(aliases.causa[0], "causa");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let aliases = ColumnAliases::from_json(r#"{ "superficie": ["superficie", "area_ha"] }"#).unwrap();
        assert_eq!(aliases.superficie, vec!["superficie", "area_ha"]);
        assert_eq!(aliases.lat, ColumnAliases::default().lat);
    }

    #[test]
    fn invalid_json_is_error() {
        assert!(ColumnAliases::from_json("{ lat: ").is_err());
        assert!(ColumnAliases::from_json(r#"{ "lat": "not-a-list" }"#).is_err());
    }
}
