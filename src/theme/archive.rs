//! Theme archive extraction.
//!
//! Archives are zip files. The payload (`assets/`, `views/`) either sits at
//! the top level or inside a single wrapping folder, such as the
//! `<repo>-<tag>/` folder of a GitHub source zipball. [`extract`] reports the
//! wrapping folder so the caller knows where the payload landed.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use zip::ZipArchive;

use super::ThemeError;

/// Payload folder whose presence at the top level marks a rootless archive.
pub const ASSETS_DIR: &str = "assets";

/// Payload folder holding view templates.
pub const VIEWS_DIR: &str = "views";

/// How the archive root is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootDetection {
    /// First path segment of entry 0, unless it is `assets`.
    #[default]
    FirstEntry,
    /// The first path segment shared by every entry, if any.
    CommonPrefix,
}

impl RootDetection {
    /// Parses a config value (`first-entry` or `common-prefix`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().replace('_', "-").as_str() {
            "first-entry" | "first" | "index" => Some(RootDetection::FirstEntry),
            "common-prefix" | "common" | "prefix" => Some(RootDetection::CommonPrefix),
            _ => None,
        }
    }
}

impl std::fmt::Display for RootDetection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootDetection::FirstEntry => write!(f, "first-entry"),
            RootDetection::CommonPrefix => write!(f, "common-prefix"),
        }
    }
}

/// Extracts `archive` into `dest` and returns the archive root, using the
/// first-entry heuristic.
///
/// An empty root means the payload sits directly under `dest`.
pub fn extract(archive: &Path, dest: &Path) -> Result<String, ThemeError> {
    extract_with(archive, dest, RootDetection::FirstEntry)
}

/// Extracts `archive` into `dest` and returns the archive root.
///
/// Every entry is written under `dest`; entries that would land outside it
/// fail the whole extraction. Existing content in `dest` is left alone.
pub fn extract_with(
    archive_path: &Path,
    dest: &Path,
    detection: RootDetection,
) -> Result<String, ThemeError> {
    let file =
        File::open(archive_path).map_err(|e| ThemeError::archive(archive_path, e.to_string()))?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| ThemeError::archive(archive_path, e.to_string()))?;

    if archive.len() == 0 {
        return Err(ThemeError::archive(archive_path, "archive has no entries"));
    }

    let root = match detection {
        RootDetection::FirstEntry => first_entry_root(&mut archive, archive_path)?,
        RootDetection::CommonPrefix => common_prefix_root(&mut archive, archive_path)?,
    };

    fs::create_dir_all(dest).map_err(|e| ThemeError::fs("create directory", dest, e))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            ThemeError::archive(archive_path, format!("failed to read entry {}: {}", i, e))
        })?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(ThemeError::archive(
                archive_path,
                format!("entry escapes the extraction directory: {}", entry.name()),
            ));
        };
        let outpath = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| ThemeError::fs("create directory", &outpath, e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| ThemeError::fs("create directory", parent, e))?;
        }

        let mut outfile =
            File::create(&outpath).map_err(|e| ThemeError::fs("create file", &outpath, e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| {
            ThemeError::archive(
                archive_path,
                format!("failed to extract {}: {}", entry.name(), e),
            )
        })?;
    }

    tracing::debug!(
        archive = %archive_path.display(),
        dest = %dest.display(),
        entries = archive.len(),
        root = %root,
        "Extracted theme archive"
    );

    Ok(root)
}

/// Root from the first path segment of entry 0.
fn first_entry_root(
    archive: &mut ZipArchive<File>,
    archive_path: &Path,
) -> Result<String, ThemeError> {
    let first = archive
        .by_index(0)
        .map_err(|e| ThemeError::archive(archive_path, format!("failed to read entry 0: {}", e)))?;

    let segment = first_segment(first.name()).unwrap_or_default();
    if segment == ASSETS_DIR {
        return Ok(String::new());
    }
    Ok(segment.to_string())
}

/// Root shared by every entry; empty when entries diverge at the top level
/// or when the shared segment is itself a payload folder.
fn common_prefix_root(
    archive: &mut ZipArchive<File>,
    archive_path: &Path,
) -> Result<String, ThemeError> {
    let mut common: Option<String> = None;

    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| {
            ThemeError::archive(archive_path, format!("failed to read entry {}: {}", i, e))
        })?;
        let name = entry.name();

        // A file sitting at the top level means there is no wrapping folder.
        if !entry.is_dir() && !name.trim_start_matches('/').contains('/') {
            return Ok(String::new());
        }

        let Some(segment) = first_segment(name) else {
            continue;
        };
        match &common {
            None => common = Some(segment.to_string()),
            Some(existing) if existing == segment => {}
            Some(_) => return Ok(String::new()),
        }
    }

    Ok(common
        .filter(|root| root != ASSETS_DIR && root != VIEWS_DIR)
        .unwrap_or_default())
}

/// First normal component of a zip entry name.
fn first_segment(name: &str) -> Option<&str> {
    Path::new(name)
        .components()
        .find_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
}
