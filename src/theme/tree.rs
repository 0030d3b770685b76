//! Recursive merge-copy and removal of directory trees.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use super::ThemeError;

/// Counters from a [`merge_copy`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Directories created under the destination, including its root.
    pub dirs_created: usize,
    /// Files copied into places where nothing existed.
    pub files_copied: usize,
    /// Files that replaced an existing destination file.
    pub files_replaced: usize,
}

impl MergeStats {
    /// Total files written.
    #[must_use]
    pub fn files_written(&self) -> usize {
        self.files_copied + self.files_replaced
    }
}

/// Counters from a [`remove_tree`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveStats {
    pub files_removed: usize,
    pub dirs_removed: usize,
}

/// Copies the tree at `source` into `destination`.
///
/// Missing directories are created and same-named files are replaced; files
/// that exist only under `destination` are kept. Running it twice with the
/// same source yields the same destination.
///
/// Symlinks under `source` are followed: a link to a directory is merged as
/// a directory and a link to a file is copied by content. Dangling links and
/// link loops are errors.
///
/// Fails with [`ThemeError::NotFound`] before touching `destination` when
/// `source` is not a directory. The first failing step aborts the walk,
/// leaving whatever was already copied in place.
pub fn merge_copy(source: &Path, destination: &Path) -> Result<MergeStats, ThemeError> {
    if !source.is_dir() {
        return Err(ThemeError::NotFound(source.to_path_buf()));
    }

    let mut stats = MergeStats::default();

    if !destination.exists() {
        fs::create_dir_all(destination)
            .map_err(|e| ThemeError::fs("create directory", destination, e))?;
        stats.dirs_created += 1;
    }

    // Parents are yielded before their children.
    for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(source, e))?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            if !target.exists() {
                fs::create_dir(&target)
                    .map_err(|e| ThemeError::fs("create directory", &target, e))?;
                stats.dirs_created += 1;
            }
            continue;
        }

        let replaced = fs::symlink_metadata(&target).is_ok();
        if replaced {
            fs::remove_file(&target).map_err(|e| ThemeError::fs("remove file", &target, e))?;
        }

        fs::copy(entry.path(), &target).map_err(|e| ThemeError::fs("copy file", &target, e))?;

        if replaced {
            stats.files_replaced += 1;
        } else {
            stats.files_copied += 1;
        }
    }

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        dirs_created = stats.dirs_created,
        files_copied = stats.files_copied,
        files_replaced = stats.files_replaced,
        "Merged directory tree"
    );

    Ok(stats)
}

/// Deletes `path` and everything below it.
///
/// Fails with [`ThemeError::NotFound`] when `path` does not exist, so callers
/// that want idempotence must check first.
pub fn remove_tree(path: &Path) -> Result<RemoveStats, ThemeError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ThemeError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ThemeError::fs("inspect", path, e)),
    };

    let mut stats = RemoveStats::default();

    if !meta.is_dir() {
        fs::remove_file(path).map_err(|e| ThemeError::fs("remove file", path, e))?;
        stats.files_removed += 1;
        return Ok(stats);
    }

    // Children are yielded before their parents, so every directory is
    // empty by the time it is reached.
    for entry in WalkDir::new(path)
        .min_depth(1)
        .contents_first(true)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| walk_error(path, e))?;

        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
                .map_err(|e| ThemeError::fs("remove directory", entry.path(), e))?;
            stats.dirs_removed += 1;
        } else {
            fs::remove_file(entry.path())
                .map_err(|e| ThemeError::fs("remove file", entry.path(), e))?;
            stats.files_removed += 1;
        }
    }

    fs::remove_dir(path).map_err(|e| ThemeError::fs("remove directory", path, e))?;
    stats.dirs_removed += 1;

    tracing::debug!(
        path = %path.display(),
        files_removed = stats.files_removed,
        dirs_removed = stats.dirs_removed,
        "Removed directory tree"
    );

    Ok(stats)
}

fn walk_error(root: &Path, err: walkdir::Error) -> ThemeError {
    let path = err.path().unwrap_or(root).to_path_buf();
    ThemeError::Filesystem {
        op: "read directory",
        path,
        source: io::Error::from(err),
    }
}
