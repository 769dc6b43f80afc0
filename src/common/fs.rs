use std::{fs::File, io::Read, path::Path};

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};

/// Error unless `path` exists and is a regular file.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() { bail!("File does not exist: {}", path.display()); }
    if !path.is_file() { bail!("Path exists but is not a file: {}", path.display()); }
    Ok(())
}

/// Hex-encoded SHA-256 of a file, streamed in 64 KiB chunks.
pub(crate) fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("open for hash {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 1 << 16];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Hex-encoded SHA-256 of an in-memory buffer.
pub(crate) fn sha256_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
