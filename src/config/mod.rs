//! Configuration module for themer.
//!
//! Handles loading and parsing the .themerrc configuration file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::theme::RootDetection;
use crate::theme::fetcher::DEFAULT_USER_AGENT;

/// Default .themerrc file content with all settings documented.
const DEFAULT_THEMERRC: &str = r#"# Themer Configuration File
# ==========================
# This file is read every time themer runs.
# Lines starting with '#' are comments. A '#' anywhere in a value starts an
# inline comment, so values cannot contain '#'.
#
# Install Locations
# -----------------
# Views of theme <name> are installed to <themes_dir>/<name>,
# assets to <assets_dir>/<name>. A leading ~ expands to your home directory.
# themes_dir = ~/.themer/themes
# assets_dir = ~/.themer/public/assets

# Staging
# -------
# Where archives are downloaded and unpacked before being merged.
# Defaults to the system temp directory.
# staging_dir = /tmp

# Archive Layout
# --------------
# How the folder wrapping assets/ and views/ is detected:
#   first-entry   - the first entry of the archive names it (default)
#   common-prefix - the top-level folder shared by every entry
# root_detection = first-entry

# Downloads
# ---------
# user_agent = themer

# Logging
# -------
# Logs are written to ~/.themer/logs/
# log_level = info            # trace, debug, info, warn, error, off
# log_retention = 24          # hours to keep old log files
# log_enabled = true
"#;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of installed theme views.
    pub themes_dir: PathBuf,
    /// Root of installed theme assets.
    pub assets_dir: PathBuf,
    /// Root for staging areas.
    pub staging_dir: PathBuf,
    /// Archive root detection strategy.
    pub root_detection: RootDetection,
    /// User agent for HTTP downloads.
    pub user_agent: String,
    /// Path to config file.
    pub config_path: PathBuf,
    /// Logging configuration.
    pub log_config: LogConfig,
    /// Settings that were ignored while parsing, for reporting once logging
    /// is up.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data = themer_dir();
        Self {
            themes_dir: data.join("themes"),
            assets_dir: data.join("public").join("assets"),
            staging_dir: std::env::temp_dir(),
            root_detection: RootDetection::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            config_path: Self::default_config_path(),
            log_config: LogConfig::default(),
            warnings: Vec::new(),
        }
    }
}

/// Returns the themer data directory (~/.themer).
#[must_use]
pub fn themer_dir() -> PathBuf {
    home_dir().join(".themer")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Expands a leading `~` to the home directory.
#[must_use]
pub fn expand_home(value: &str) -> PathBuf {
    if value == "~" {
        return home_dir();
    }
    match value.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(value),
    }
}

impl Config {
    /// Returns the default config file path (~/.themerrc).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        home_dir().join(".themerrc")
    }

    /// Loads configuration from the default path, creating it if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if config cannot be read.
    pub fn load() -> io::Result<Self> {
        let path = Self::default_config_path();
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path, creating it if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if config cannot be read.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self {
            config_path: path.to_path_buf(),
            ..Self::default()
        };
        config.parse(&content);

        Ok(config)
    }

    /// Creates the default config file.
    fn create_default_config(path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_THEMERRC.as_bytes())?;
        Ok(())
    }

    /// Parses the config file content.
    pub fn parse(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                // Remove inline comments
                let value = value.split('#').next().unwrap_or(value).trim();

                self.apply_setting(key, value);
            }
        }
    }

    /// Applies a single setting.
    fn apply_setting(&mut self, key: &str, value: &str) {
        match key {
            "themes_dir" | "themes-dir" => self.themes_dir = expand_home(value),
            "assets_dir" | "assets-dir" => self.assets_dir = expand_home(value),
            "staging_dir" | "staging-dir" => self.staging_dir = expand_home(value),
            "root_detection" | "root-detection" => match RootDetection::parse(value) {
                Some(detection) => self.root_detection = detection,
                None => self.warnings.push(format!(
                    "Unknown root_detection value '{}', using {}",
                    value, self.root_detection
                )),
            },
            "user_agent" | "user-agent" => {
                if !value.is_empty() {
                    self.user_agent = value.to_string();
                }
            }
            "log_level" | "log-level" => {
                self.log_config.level = LogConfig::parse_level(value);
            }
            "log_retention" | "log-retention" | "log_retention_hours" => {
                self.log_config.retention_hours = LogConfig::parse_retention(value);
            }
            "log_enabled" | "log-enabled" | "logging" => {
                self.log_config.enabled =
                    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1" | "on");
            }
            _ => self
                .warnings
                .push(format!("Ignoring unknown config key '{}'", key)),
        }
    }

    /// Reloads the configuration from disk.
    ///
    /// # Errors
    /// Returns error if config cannot be read.
    pub fn reload(&mut self) -> io::Result<()> {
        let path = self.config_path.clone();
        *self = Self::load_from(&path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert!(config.themes_dir.ends_with(".themer/themes"));
        assert!(config.assets_dir.ends_with(".themer/public/assets"));
        assert_eq!(config.root_detection, RootDetection::FirstEntry);
        assert!(config.config_path.ends_with(".themerrc"));
    }

    #[test]
    fn test_parse_settings() {
        let mut config = Config::default();
        config.parse(
            "# comment\n\
             themes_dir = /srv/themes\n\
             assets_dir = /srv/public/assets   # inline\n\
             staging_dir = /var/tmp\n\
             root_detection = common-prefix\n\
             user_agent = my-site/1.0\n\
             log_level = DEBUG\n\
             log_retention = 48\n\
             logging = off\n\
             unknown = whatever\n",
        );

        assert_eq!(config.themes_dir, PathBuf::from("/srv/themes"));
        assert_eq!(config.assets_dir, PathBuf::from("/srv/public/assets"));
        assert_eq!(config.staging_dir, PathBuf::from("/var/tmp"));
        assert_eq!(config.root_detection, RootDetection::CommonPrefix);
        assert_eq!(config.user_agent, "my-site/1.0");
        assert_eq!(config.log_config.level, "debug");
        assert_eq!(config.log_config.retention_hours, 48);
        assert!(!config.log_config.enabled);
    }

    #[test]
    fn test_invalid_root_detection_keeps_default() {
        let mut config = Config::default();
        config.parse("root_detection = sideways");
        assert_eq!(config.root_detection, RootDetection::FirstEntry);
    }

    #[test]
    fn test_rejected_settings_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".themerrc");
        fs::write(
            &path,
            "root_detection = common_prefx\nthemes_dri = /srv/themes\nlog_enabled = false\n",
        )
        .expect("write");

        let config = Config::load_from(&path).expect("load");

        assert_eq!(config.root_detection, RootDetection::FirstEntry);
        assert_eq!(
            config.warnings,
            [
                "Unknown root_detection value 'common_prefx', using first-entry",
                "Ignoring unknown config key 'themes_dri'",
            ]
        );
    }

    #[test]
    fn test_valid_config_has_no_warnings() {
        let mut config = Config::default();
        config.parse("root_detection = common-prefix\n# themes_dir = /x\n");
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_hyphenated_log_keys() {
        let mut config = Config::default();
        config.parse("log-level = warn\nlog-retention = 6\nlog-enabled = no\n");
        assert_eq!(config.log_config.level, "warn");
        assert_eq!(config.log_config.retention_hours, 6);
        assert!(!config.log_config.enabled);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_hash_starts_inline_comment() {
        let mut config = Config::default();
        config.parse("themes_dir = /srv/site#2/themes\n");
        assert_eq!(config.themes_dir, PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~/themes"), home.join("themes"));
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("rel/~x"), PathBuf::from("rel/~x"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(".themerrc");

        let config = Config::load_from(&path).expect("load");

        assert!(path.exists());
        assert_eq!(config.config_path, path);
        let content = fs::read_to_string(&path).expect("read");
        assert!(content.contains("root_detection"));
        // Everything in the default file is commented out.
        assert_eq!(config.themes_dir, Config::default().themes_dir);
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".themerrc");
        fs::write(&path, "themes_dir = /a\n").expect("write");

        let mut config = Config::load_from(&path).expect("load");
        assert_eq!(config.themes_dir, PathBuf::from("/a"));

        fs::write(&path, "themes_dir = /b\n").expect("write");
        config.reload().expect("reload");
        assert_eq!(config.themes_dir, PathBuf::from("/b"));
    }
}
