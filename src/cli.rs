//! Command-line argument parsing.

use std::path::PathBuf;

/// Usage text printed by `--help` and on usage errors.
pub const USAGE: &str = "\
Usage:
  themer install <URL> <THEME> [OPTIONS]
  themer uninstall <THEME> [OPTIONS]
  themer status <THEME> [OPTIONS]

Options:
  --themes-dir <DIR>   Root directory for theme views
  --assets-dir <DIR>   Root directory for theme assets
  --config <FILE>      Config file (default: ~/.themerrc)
  --json               Print status as JSON
  --verbose            Also log to stderr
  --version, -v        Show version
  --help, -h           Show this help";

/// Subcommand to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Install { url: String, theme: String },
    Uninstall { theme: String },
    Status { theme: String },
    Version,
    Help,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub themes_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

impl Cli {
    /// Parses arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positional = Vec::new();
        let mut themes_dir = None;
        let mut assets_dir = None;
        let mut config = None;
        let mut json = false;
        let mut verbose = false;

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--version" | "-v" => return Ok(Self::bare(Command::Version)),
                "--help" | "-h" => return Ok(Self::bare(Command::Help)),
                "--json" => json = true,
                "--verbose" => verbose = true,
                "--themes-dir" => themes_dir = Some(Self::value(&arg, args.next())?),
                "--assets-dir" => assets_dir = Some(Self::value(&arg, args.next())?),
                "--config" => config = Some(Self::value(&arg, args.next())?),
                flag if flag.starts_with('-') => {
                    return Err(format!("Unknown option: {}", flag));
                }
                _ => positional.push(arg),
            }
        }

        let command = match positional.as_slice() {
            [cmd, url, theme] if cmd == "install" => Command::Install {
                url: url.clone(),
                theme: theme.clone(),
            },
            [cmd, theme] if cmd == "uninstall" => Command::Uninstall {
                theme: theme.clone(),
            },
            [cmd, theme] if cmd == "status" => Command::Status {
                theme: theme.clone(),
            },
            [] => return Err("Missing command".to_string()),
            [cmd, ..] => {
                return Err(format!("Invalid arguments for command: {}", cmd));
            }
        };

        Ok(Self {
            command,
            themes_dir,
            assets_dir,
            config,
            json,
            verbose,
        })
    }

    fn bare(command: Command) -> Self {
        Self {
            command,
            themes_dir: None,
            assets_dir: None,
            config: None,
            json: false,
            verbose: false,
        }
    }

    fn value(flag: &str, value: Option<String>) -> Result<PathBuf, String> {
        value
            .filter(|v| !v.starts_with('-'))
            .map(PathBuf::from)
            .ok_or_else(|| format!("{} requires a value", flag))
    }
}
