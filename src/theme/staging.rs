//! Staging area for a single install.
//!
//! Each install unpacks into `<root>/<id>/` after downloading to
//! `<root>/<id>.zip`, where `id` is 10 random bytes rendered as hex. Both are
//! removed when the [`StagingArea`] is dropped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::RngCore;

use super::ThemeError;

/// Random bytes per staging id (80 bits).
pub const STAGING_ID_BYTES: usize = 10;

/// Source of randomness for staging names.
pub trait RandomSource {
    /// Fills `buf` with random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// Operating system entropy.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        rand::rngs::OsRng.try_fill_bytes(buf).map_err(io::Error::other)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).fill(buf)
    }
}

/// Generates a fresh staging id.
pub fn staging_id(random: &mut impl RandomSource) -> Result<String, ThemeError> {
    let mut bytes = [0u8; STAGING_ID_BYTES];
    random.fill(&mut bytes).map_err(ThemeError::Entropy)?;
    Ok(hex::encode(bytes))
}

/// Scoped staging directory plus archive file.
#[derive(Debug)]
pub struct StagingArea {
    id: String,
    dir: PathBuf,
    archive: PathBuf,
}

impl StagingArea {
    /// Creates `<root>/<id>/` with a fresh id.
    ///
    /// Fails if that directory already exists rather than sharing it.
    pub fn create(root: &Path, random: &mut impl RandomSource) -> Result<Self, ThemeError> {
        let id = staging_id(random)?;
        let dir = root.join(&id);
        let archive = root.join(format!("{}.zip", id));

        fs::create_dir_all(root).map_err(|e| ThemeError::fs("create directory", root, e))?;
        fs::create_dir(&dir).map_err(|e| ThemeError::fs("create staging directory", &dir, e))?;

        tracing::debug!(staging = %dir.display(), "Created staging area");

        Ok(Self { id, dir, archive })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Directory the archive is unpacked into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the archive is downloaded to.
    #[must_use]
    pub fn archive_path(&self) -> &Path {
        &self.archive
    }

    /// Deletes the downloaded archive.
    pub fn remove_archive(&self) -> Result<(), ThemeError> {
        match fs::remove_file(&self.archive) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ThemeError::fs("remove archive", &self.archive, e)),
        }
    }
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        if let Err(e) = self.remove_archive() {
            tracing::warn!("Failed to clean up staging archive: {}", e);
        }
        if self.dir.exists() {
            if let Err(e) = fs::remove_dir_all(&self.dir) {
                tracing::warn!(
                    "Failed to clean up staging directory {}: {}",
                    self.dir.display(),
                    e
                );
            }
        }
    }
}
