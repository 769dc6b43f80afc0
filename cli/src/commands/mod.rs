pub mod export;
pub mod inspect;
pub mod map;
pub mod summary;

use std::{path::Path, sync::Arc};

use anyhow::Result;
use incendios::{ColumnAliases, DatasetCache, DiskArchive, IncidentFilter, Incidents, LoadRequest};
use tracing::info;

use crate::cli::Cli;

/// Load the archive through the dataset cache using the global options.
pub(crate) fn load(cli: &Cli, archive: &Path) -> Result<Arc<Incidents>> {
    let aliases = match &cli.aliases {
        Some(path) => ColumnAliases::read_json(path)?,
        None => ColumnAliases::default(),
    };
    let source = DiskArchive::new(archive);

    let mut request = LoadRequest::new(&source, &aliases);
    if let Some(lookups) = &cli.lookups {
        request = request.with_lookups(lookups);
    }

    info!("[load] reading {}", archive.display());
    DatasetCache::new().get_or_load(&request)
}

/// Load then filter; reports an empty selection without failing.
pub(crate) fn load_filtered(cli: &Cli, archive: &Path, filter: &IncidentFilter) -> Result<Incidents> {
    let incidents = load(cli, archive)?;
    let selected = filter.apply(&incidents)?;
    if selected.is_empty() {
        eprintln!("No incidents match the selected filters.");
    } else if !filter.is_empty() {
        info!("[filter] {} of {} incidents selected", selected.len(), incidents.len());
    }
    Ok(selected)
}
