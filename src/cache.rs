use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    common::{sha256_bytes, sha256_file},
    dataset::{load_from_bytes, Incidents},
    lookup::Lookups,
    schema::ColumnAliases,
    source::ArchiveSource,
};

/// Everything a load depends on.
pub struct LoadRequest<'a> {
    pub archive: &'a dyn ArchiveSource,
    pub lookups: Option<&'a Path>,
    pub aliases: &'a ColumnAliases,
}

impl<'a> LoadRequest<'a> {
    pub fn new(archive: &'a dyn ArchiveSource, aliases: &'a ColumnAliases) -> Self {
        Self { archive, lookups: None, aliases }
    }

    pub fn with_lookups(mut self, path: &'a Path) -> Self {
        self.lookups = Some(path);
        self
    }
}

/// Identity of a loaded dataset: source name plus content hashes of every input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub name: String,
    pub archive_sha256: String,
    pub lookups_sha256: Option<String>,
    pub aliases_sha256: String,
}

impl SourceKey {
    fn new(request: &LoadRequest, archive: &[u8]) -> Result<Self> {
        let lookups_sha256 = request.lookups.map(sha256_file).transpose()
            .context("[cache] Failed to hash lookup file")?;
        let aliases = serde_json::to_vec(request.aliases)?;
        Ok(Self {
            name: request.archive.name().to_string(),
            archive_sha256: sha256_bytes(archive),
            lookups_sha256,
            aliases_sha256: sha256_bytes(&aliases),
        })
    }
}

/// Memoizes normalized datasets by source identity.
///
/// A source whose content changes gets a new key; the stale snapshot for the
/// same source name is evicted when the new one is stored. Failed loads are
/// never cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<Incidents>>,
    hits: usize,
    misses: usize,
}

impl DatasetCache {
    pub fn new() -> Self { Self::default() }

    /// Return the cached snapshot for this request, loading it on a miss.
    pub fn get_or_load(&mut self, request: &LoadRequest) -> Result<Arc<Incidents>> {
        let bytes = request.archive.bytes()?;
        let key = SourceKey::new(request, &bytes)?;

        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            debug!("[cache] hit for {}", key.name);
            return Ok(hit.clone());
        }

        self.misses += 1;
        debug!("[cache] miss for {} ({})", key.name, &key.archive_sha256[..12]);
        let lookups = request.lookups.map(Lookups::read).transpose()?;
        let incidents = Arc::new(load_from_bytes(&key.name, &bytes, lookups.as_ref(), request.aliases)?);

        self.entries.retain(|cached, _| cached.name != key.name);
        self.entries.insert(key, incidents.clone());
        Ok(incidents)
    }

    /// Drop every snapshot loaded from `name`; returns how many were removed.
    pub fn invalidate(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|cached, _| cached.name != name);
        before - self.entries.len()
    }

    pub fn clear(&mut self) { self.entries.clear(); }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn hits(&self) -> usize { self.hits }

    pub fn misses(&self) -> usize { self.misses }
}
