#![doc = "Incendios public API"]
mod cache;
mod common;
mod dataset;
mod filter;
mod io;
mod lookup;
mod normalize;
mod schema;
mod source;
mod summary;

#[doc(inline)]
pub use cache::{DatasetCache, LoadRequest, SourceKey};

#[doc(inline)]
pub use dataset::{Incidents, load_incidents};

#[doc(inline)]
pub use filter::IncidentFilter;

#[doc(inline)]
pub use lookup::{Lookup, LookupKind, Lookups, normalize_code};

#[doc(inline)]
pub use normalize::normalize;

#[doc(inline)]
pub use schema::{ColumnAliases, detect_column, detect_in};

#[doc(inline)]
pub use source::{ArchiveSource, DiskArchive, MemArchive};

#[doc(inline)]
pub use summary::{
    CauseShare, MAX_MAP_POINTS, MapPoint, MapView, YearTotal,
    cause_distribution, map_points, map_view, points_to_geojson, yearly_area,
};

/// Canonical column names shared by every normalized table.
pub mod columns {
    pub use crate::schema::{
        CAUSA, CAUSA_TEXTO, COMUNIDAD, FECHA, IDCOMUNIDAD, IDPROVINCIA, LAT, LNG, MUNICIPIO,
        PROVINCIA, SUPERFICIE,
    };
}

#[doc(inline)]
pub use normalize::DEFAULT_CAUSE;
