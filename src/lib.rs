//! Themer
//!
//! Installs and uninstalls themes: zip archives bundling view templates
//! and static assets.
//!
//! # Architecture
//!
//! - **Theme Module**: fetch, extraction, merge-copy, removal, and the
//!   installer that sequences them
//! - **Config Module**: the `~/.themerrc` settings file
//! - **Logging Module**: file-based tracing output
//! - **CLI Module**: argument parsing for the `themer` binary
//!
//! # Usage
//!
//! ```no_run
//! use themer::theme::{InstallRequest, ThemeInstaller};
//!
//! let request = InstallRequest::new(
//!     "https://example.com/theme.zip",
//!     "ocean",
//!     "/srv/themes",
//!     "/srv/public/assets",
//! )?;
//! let mut installer = ThemeInstaller::new(request);
//! installer.install()?;
//! # Ok::<(), themer::theme::ThemeError>(())
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod theme;

// Re-export main types
pub use config::Config;
pub use theme::{InstallRequest, ThemeError, ThemeInstaller};
