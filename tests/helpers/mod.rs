//! Shared fixtures for themer integration tests.

#![allow(dead_code, clippy::expect_used)]

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;

use themer::theme::{Fetcher, RandomSource, ThemeError};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

/// Snapshot of a directory tree: relative path → file content, `None` for
/// directories.
pub type TreeSnapshot = BTreeMap<String, Option<Vec<u8>>>;

/// Builds a zip archive in memory. `None` content adds a directory entry.
pub fn zip_bytes(entries: &[(&str, Option<&str>)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        match content {
            Some(body) => {
                zip.start_file(*name, options).expect("start file");
                zip.write_all(body.as_bytes()).expect("write entry");
            }
            None => {
                zip.add_directory(*name, options).expect("add directory");
            }
        }
    }
    zip.finish().expect("finish zip").into_inner()
}

/// Writes `files` (relative path → content) under `root`.
pub fn write_tree<'a, I>(root: &Path, files: I)
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    fs::create_dir_all(root).expect("create root");
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, content).expect("write file");
    }
}

/// Captures every entry below `root`. A missing root yields an empty map.
pub fn snapshot(root: &Path) -> TreeSnapshot {
    let mut tree = TreeSnapshot::new();
    if !root.exists() {
        return tree;
    }
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.expect("walk");
        let relative = entry
            .path()
            .strip_prefix(root)
            .expect("relative")
            .to_string_lossy()
            .replace('\\', "/");
        let content = if entry.file_type().is_dir() {
            None
        } else {
            Some(fs::read(entry.path()).expect("read"))
        };
        tree.insert(relative, content);
    }
    tree
}

/// Serves archives from memory by exact URL.
#[derive(Default)]
pub struct MemoryFetcher {
    archives: HashMap<String, Vec<u8>>,
    calls: Cell<usize>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.archives.insert(url.to_string(), bytes);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, ThemeError> {
        self.calls.set(self.calls.get() + 1);
        let bytes = self.archives.get(url).ok_or_else(|| ThemeError::Fetch {
            url: url.to_string(),
            reason: "server returned 404 Not Found".to_string(),
        })?;
        fs::write(dest, bytes).map_err(|source| ThemeError::Filesystem {
            op: "write archive",
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(bytes.len() as u64)
    }
}

/// Deterministic randomness: every fill uses the next byte value.
pub struct SequenceRandom(pub u8);

impl RandomSource for SequenceRandom {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        buf.fill(self.0);
        self.0 = self.0.wrapping_add(1);
        Ok(())
    }
}
