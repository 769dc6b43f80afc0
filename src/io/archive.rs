//! Zip archive reading: locating the incident CSV inside an upload.

use std::{ffi::OsStr, io::{Cursor, Read}, path::Path};

use anyhow::{Context, Result};
use polars::frame::DataFrame;
use zip::ZipArchive;

use crate::io::csv::read_csv_bytes;

/// Folder macOS Finder adds to archives it creates.
const MACOS_METADATA_DIR: &str = "__MACOSX";
/// AppleDouble resource-fork files sitting next to the real entries.
const RESOURCE_FORK_PREFIX: &str = "._";

/// True for entries that belong to macOS archive metadata.
pub(crate) fn is_metadata_entry(name: &str) -> bool {
    let mut parts = name.split('/').filter(|part| !part.is_empty());
    let basename = name.rsplit('/').find(|part| !part.is_empty()).unwrap_or(name);
    parts.any(|part| part == MACOS_METADATA_DIR) || basename.starts_with(RESOURCE_FORK_PREFIX)
}

/// First entry name ending in `.csv` that is neither a directory nor macOS metadata.
pub(crate) fn find_csv_entry<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    names.into_iter().find(|name| {
        !name.ends_with('/')
            && !is_metadata_entry(name)
            && Path::new(name).extension().is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new("csv")))
    })
}

/// Parse the first qualifying CSV entry of a zip archive held in memory.
///
/// Returns `Ok(None)` when the archive is readable but holds no CSV entry.
pub(crate) fn read_csv_from_zip_bytes(bytes: &[u8], label: &str) -> Result<Option<(String, DataFrame)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .with_context(|| format!("[io::archive] Failed to read zip archive {label}"))?;

    let Some(entry) = find_csv_entry(archive.file_names()).map(str::to_owned) else {
        return Ok(None);
    };

    let mut file = archive.by_name(&entry)
        .with_context(|| format!("[io::archive] Failed to open entry {entry} in {label}"))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .with_context(|| format!("[io::archive] Failed to decompress entry {entry} in {label}"))?;

    let df = read_csv_bytes(&contents)
        .with_context(|| format!("[io::archive] Failed to parse {entry} in {label}"))?;
    Ok(Some((entry, df)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::{write::SimpleFileOptions, ZipWriter};

    use super::*;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn metadata_entries() {
        assert!(is_metadata_entry("__MACOSX/incendios.csv"));
        assert!(is_metadata_entry("__MACOSX/data/._incendios.csv"));
        assert!(is_metadata_entry("data/._incendios.csv"));
        assert!(!is_metadata_entry("data/incendios.csv"));
        assert!(!is_metadata_entry("macosx.csv"));
    }

    #[test]
    fn finds_first_real_csv() {
        let names = ["readme.txt", "__MACOSX/._a.csv", "._b.csv", "dir/", "data/Fires.CSV", "other.csv"];
        assert_eq!(find_csv_entry(names), Some("data/Fires.CSV"));
        assert_eq!(find_csv_entry(["readme.txt", "__MACOSX/a.csv"]), None);
    }

    #[test]
    fn reads_csv_skipping_metadata() {
        let bytes = zip_with(&[
            ("__MACOSX/._incendios.csv", "garbage"),
            ("incendios.csv", "lat,lng\n40.1,-3.6\n41.0,-4.0\n"),
        ]);
        let (entry, df) = read_csv_from_zip_bytes(&bytes, "upload").unwrap().unwrap();
        assert_eq!(entry, "incendios.csv");
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn archive_without_csv_is_none() {
        let bytes = zip_with(&[("notes.txt", "nothing here")]);
        assert!(read_csv_from_zip_bytes(&bytes, "upload").unwrap().is_none());
    }

    #[test]
    fn unreadable_archive_is_error() {
        assert!(read_csv_from_zip_bytes(b"not a zip", "upload").is_err());
    }
}
