//! Theme package installation.
//!
//! A theme is a zip archive carrying an `assets` tree (static files) and a
//! `views` tree (templates), optionally wrapped in a single top-level folder.
//! Installing fetches the archive into a staging area, unpacks it, and
//! merge-copies both trees into their destination roots:
//!
//! - `assets/` → `<assets_root>/<theme>`
//! - `views/`  → `<themes_root>/<theme>`
//!
//! Uninstalling removes those two directories again.

pub mod archive;
pub mod fetcher;
pub mod installer;
pub mod staging;
pub mod tree;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use archive::{RootDetection, extract, extract_with};
pub use fetcher::{Fetcher, HttpFetcher, LocalFetcher, SchemeFetcher};
pub use installer::{InstallReport, ThemeInstaller, ThemeStatus};
pub use staging::{OsRandom, RandomSource, StagingArea};
pub use tree::{MergeStats, RemoveStats, merge_copy, remove_tree};

/// Errors raised while installing or removing a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// The archive could not be retrieved.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The archive is missing, corrupt, or not a zip file.
    #[error("Failed to open archive {}: {reason}", path.display())]
    ArchiveOpen { path: PathBuf, reason: String },

    /// A filesystem step failed.
    #[error("Failed to {op} {}", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A path that must exist does not.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The theme name cannot be used as a single directory segment.
    #[error("Invalid theme name: {0:?}")]
    InvalidThemeName(String),

    /// The OS entropy source failed.
    #[error("Failed to read random bytes")]
    Entropy(#[source] io::Error),
}

/// Coarse category of a [`ThemeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeErrorKind {
    Fetch,
    ArchiveOpen,
    Filesystem,
    NotFound,
    InvalidThemeName,
    Entropy,
}

impl ThemeError {
    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ThemeErrorKind {
        match self {
            ThemeError::Fetch { .. } => ThemeErrorKind::Fetch,
            ThemeError::ArchiveOpen { .. } => ThemeErrorKind::ArchiveOpen,
            ThemeError::Filesystem { .. } => ThemeErrorKind::Filesystem,
            ThemeError::NotFound(_) => ThemeErrorKind::NotFound,
            ThemeError::InvalidThemeName(_) => ThemeErrorKind::InvalidThemeName,
            ThemeError::Entropy(_) => ThemeErrorKind::Entropy,
        }
    }

    pub(crate) fn fs(op: &'static str, path: &Path, source: io::Error) -> Self {
        ThemeError::Filesystem {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn fetch(url: &str, reason: impl Into<String>) -> Self {
        ThemeError::Fetch {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn archive(path: &Path, reason: impl Into<String>) -> Self {
        ThemeError::ArchiveOpen {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Inputs of a single install or uninstall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    source_url: String,
    theme_name: String,
    themes_root: PathBuf,
    assets_root: PathBuf,
}

impl InstallRequest {
    /// Builds a request, rejecting theme names that are not a plain
    /// directory segment.
    pub fn new(
        source_url: impl Into<String>,
        theme_name: impl Into<String>,
        themes_root: impl Into<PathBuf>,
        assets_root: impl Into<PathBuf>,
    ) -> Result<Self, ThemeError> {
        let theme_name = theme_name.into();
        validate_theme_name(&theme_name)?;

        Ok(Self {
            source_url: source_url.into(),
            theme_name,
            themes_root: themes_root.into(),
            assets_root: assets_root.into(),
        })
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    #[must_use]
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    #[must_use]
    pub fn themes_root(&self) -> &Path {
        &self.themes_root
    }

    #[must_use]
    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Where the theme's views are installed.
    #[must_use]
    pub fn theme_path(&self) -> PathBuf {
        self.themes_root.join(&self.theme_name)
    }

    /// Where the theme's assets are installed.
    #[must_use]
    pub fn assets_path(&self) -> PathBuf {
        self.assets_root.join(&self.theme_name)
    }
}

/// Checks that `name` is usable as exactly one path segment.
pub fn validate_theme_name(name: &str) -> Result<(), ThemeError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
        || name.trim() != name;

    if invalid {
        return Err(ThemeError::InvalidThemeName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_paths() {
        let request = InstallRequest::new(
            "https://example.com/theme.zip",
            "ocean",
            "/srv/themes",
            "/srv/public/assets",
        )
        .expect("valid request");

        assert_eq!(request.theme_path(), PathBuf::from("/srv/themes/ocean"));
        assert_eq!(
            request.assets_path(),
            PathBuf::from("/srv/public/assets/ocean")
        );
        assert_eq!(request.source_url(), "https://example.com/theme.zip");
    }

    #[test]
    fn test_validate_theme_name_rejects_traversal() {
        for name in ["", ".", "..", "../etc", "a/b", "a\\b", " ocean", "oc\0ean"] {
            let err = validate_theme_name(name).expect_err(name);
            assert_eq!(err.kind(), ThemeErrorKind::InvalidThemeName);
        }
    }

    #[test]
    fn test_validate_theme_name_accepts_plain_names() {
        for name in ["ocean", "my-theme_v2", "Dark.Theme", "..hidden"] {
            assert!(validate_theme_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_error_display_names_step_and_path() {
        let err = ThemeError::fs(
            "copy file",
            Path::new("/tmp/x"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to copy file /tmp/x");
        assert_eq!(err.kind(), ThemeErrorKind::Filesystem);
    }

    #[test]
    fn test_error_cause_printed_once() {
        use std::error::Error as _;

        let err = ThemeError::fs(
            "copy file",
            Path::new("/tmp/x"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let mut chain = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        assert_eq!(chain, ["Failed to copy file /tmp/x", "denied"]);

        let err = ThemeError::Entropy(io::Error::other("no entropy"));
        assert_eq!(err.to_string(), "Failed to read random bytes");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("no entropy")
        );
    }
}
