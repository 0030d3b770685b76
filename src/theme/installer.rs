//! Theme installer.
//!
//! Sequences fetch, extraction, and the two merge-copies for an install,
//! and the two removals for an uninstall.
//!
//! Every step is blocking and runs to completion before the next starts.
//! Errors abort the operation at once. A failed install removes its staging
//! area but does not roll back destination trees that were already merged,
//! so the assets of a theme can be updated while its views are not.
//! Concurrent installs and uninstalls of the same theme are not
//! coordinated.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::archive::{self, ASSETS_DIR, RootDetection, VIEWS_DIR};
use super::fetcher::{Fetcher, SchemeFetcher};
use super::staging::{OsRandom, RandomSource, StagingArea};
use super::tree::{self, MergeStats};
use super::{InstallRequest, ThemeError};

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Staging id used for this install.
    pub staging_id: String,
    /// Archive root the payload was found under (empty when flat).
    pub archive_root: String,
    /// Archive size in bytes.
    pub archive_bytes: u64,
    pub assets: MergeStats,
    pub views: MergeStats,
}

/// Which parts of a theme are currently on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeStatus {
    pub assets_installed: bool,
    pub views_installed: bool,
}

impl ThemeStatus {
    /// Both assets and views are present.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.assets_installed && self.views_installed
    }

    /// Exactly one of assets and views is present.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.assets_installed != self.views_installed
    }
}

/// Installs and uninstalls one theme.
pub struct ThemeInstaller<F = SchemeFetcher, R = OsRandom> {
    request: InstallRequest,
    fetcher: F,
    random: R,
    staging_root: PathBuf,
    root_detection: RootDetection,
}

impl ThemeInstaller {
    /// Creates an installer with the default fetcher, OS randomness, and the
    /// system temp directory as staging root.
    #[must_use]
    pub fn new(request: InstallRequest) -> Self {
        Self::with_parts(request, SchemeFetcher::default(), OsRandom)
    }
}

impl<F: Fetcher, R: RandomSource> ThemeInstaller<F, R> {
    /// Creates an installer from explicit collaborators.
    pub fn with_parts(request: InstallRequest, fetcher: F, random: R) -> Self {
        Self {
            request,
            fetcher,
            random,
            staging_root: std::env::temp_dir(),
            root_detection: RootDetection::default(),
        }
    }

    /// Sets the directory staging areas are created under.
    pub fn staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Sets how the archive root is detected.
    pub fn root_detection(mut self, detection: RootDetection) -> Self {
        self.root_detection = detection;
        self
    }

    #[must_use]
    pub fn request(&self) -> &InstallRequest {
        &self.request
    }

    /// Fetches, unpacks, and merges the theme into place.
    pub fn install(&mut self) -> Result<InstallReport, ThemeError> {
        let theme = self.request.theme_name().to_string();
        let url = self.request.source_url().to_string();

        tracing::info!(theme = %theme, url = %url, "Installing theme");

        let staging = StagingArea::create(&self.staging_root, &mut self.random)?;

        let archive_bytes = self.fetcher.fetch(&url, staging.archive_path())?;
        tracing::debug!(theme = %theme, bytes = archive_bytes, "Fetched theme archive");

        let archive_root =
            archive::extract_with(staging.archive_path(), staging.dir(), self.root_detection)?;
        let payload = payload_dir(staging.dir(), &archive_root);

        let assets_dest = self.request.assets_path();
        let assets = tree::merge_copy(&payload.join(ASSETS_DIR), &assets_dest)?;
        tracing::info!(
            theme = %theme,
            dest = %assets_dest.display(),
            files = assets.files_written(),
            "Installed theme assets"
        );

        let views_dest = self.request.theme_path();
        let views = tree::merge_copy(&payload.join(VIEWS_DIR), &views_dest)?;
        tracing::info!(
            theme = %theme,
            dest = %views_dest.display(),
            files = views.files_written(),
            "Installed theme views"
        );

        staging.remove_archive()?;

        Ok(InstallReport {
            staging_id: staging.id().to_string(),
            archive_root,
            archive_bytes,
            assets,
            views,
        })
    }

    /// Removes the theme's assets and views, skipping whichever is absent.
    pub fn uninstall(&self) -> Result<(), ThemeError> {
        let theme = self.request.theme_name();

        for path in [self.request.assets_path(), self.request.theme_path()] {
            if path.is_dir() {
                tree::remove_tree(&path)?;
                tracing::info!(theme = %theme, path = %path.display(), "Removed theme directory");
            } else {
                tracing::debug!(theme = %theme, path = %path.display(), "Nothing to remove");
            }
        }

        Ok(())
    }

    /// Reports which destination directories exist.
    #[must_use]
    pub fn status(&self) -> ThemeStatus {
        ThemeStatus {
            assets_installed: self.request.assets_path().is_dir(),
            views_installed: self.request.theme_path().is_dir(),
        }
    }
}

fn payload_dir(staging: &Path, root: &str) -> PathBuf {
    if root.is_empty() {
        staging.to_path_buf()
    } else {
        staging.join(root)
    }
}
