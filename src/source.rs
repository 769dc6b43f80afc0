use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};

use crate::common::require_file_exists;

/// Read-only access to the bytes of an incident archive.
pub trait ArchiveSource: Send + Sync {
    /// Identity of the source, e.g. a file path or an upload name.
    fn name(&self) -> &str;
    fn bytes(&self) -> Result<Arc<[u8]>>;
}

/// Archive stored on disk.
#[derive(Debug, Clone)]
pub struct DiskArchive {
    path: PathBuf,
    name: String,
}

impl DiskArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl ArchiveSource for DiskArchive {
    fn name(&self) -> &str { &self.name }

    fn bytes(&self) -> Result<Arc<[u8]>> {
        require_file_exists(&self.path)
            .context("[source] Incident archive not found")?;
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("[source] Failed to read archive {}", self.path.display()))?;
        Ok(Arc::from(bytes))
    }
}

/// Archive already held in memory, e.g. an uploaded file.
#[derive(Debug, Clone)]
pub struct MemArchive {
    name: String,
    bytes: Arc<[u8]>,
}

impl MemArchive {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }
}

impl ArchiveSource for MemArchive {
    fn name(&self) -> &str { &self.name }

    fn bytes(&self) -> Result<Arc<[u8]>> { Ok(self.bytes.clone()) }
}
