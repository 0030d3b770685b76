//! Themer - Main entry point.
//!
//! Installs, uninstalls, and inspects view/asset themes.
//!
//! Usage: themer <install|uninstall|status> ... [OPTIONS]
//!
//! Directory options override the values in ~/.themerrc.

use std::env;
use std::process;

use themer::cli::{Cli, Command, USAGE};
use themer::config::Config;
use themer::logging;
use themer::theme::{InstallRequest, OsRandom, SchemeFetcher, ThemeInstaller};

/// Current version of themer.
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cli = match Cli::parse(env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            process::exit(2);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (url, theme) = match &cli.command {
        Command::Version => {
            println!("themer v{}", VERSION);
            return Ok(());
        }
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Install { url, theme } => (url.as_str(), theme.as_str()),
        Command::Uninstall { theme } | Command::Status { theme } => ("", theme.as_str()),
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.themes_dir {
        config.themes_dir.clone_from(dir);
    }
    if let Some(dir) = &cli.assets_dir {
        config.assets_dir.clone_from(dir);
    }

    logging::init(&config.log_config, cli.verbose)?;
    tracing::debug!("Config loaded from {}", config.config_path.display());
    for warning in &config.warnings {
        tracing::warn!("{}: {}", config.config_path.display(), warning);
    }

    let request = InstallRequest::new(url, theme, &config.themes_dir, &config.assets_dir)?;
    let fetcher = SchemeFetcher::new(&config.user_agent);
    let mut installer = ThemeInstaller::with_parts(request, fetcher, OsRandom)
        .staging_root(&config.staging_dir)
        .root_detection(config.root_detection);

    match cli.command {
        Command::Install { .. } => {
            let report = installer.install()?;
            println!(
                "Installed theme '{}' ({} asset files, {} view files)",
                theme,
                report.assets.files_written(),
                report.views.files_written()
            );
        }
        Command::Uninstall { .. } => {
            installer.uninstall()?;
            println!("Uninstalled theme '{}'", theme);
        }
        Command::Status { .. } => {
            let status = installer.status();
            if cli.json {
                println!("{}", serde_json::to_string(&status)?);
            } else {
                let state = if status.is_installed() {
                    "installed"
                } else if status.is_partial() {
                    "partially installed"
                } else {
                    "not installed"
                };
                println!("Theme '{}' is {}", theme, state);
                println!(
                    "  views:  {} ({})",
                    installer.request().theme_path().display(),
                    if status.views_installed { "present" } else { "absent" }
                );
                println!(
                    "  assets: {} ({})",
                    installer.request().assets_path().display(),
                    if status.assets_installed { "present" } else { "absent" }
                );
            }
        }
        Command::Version | Command::Help => {}
    }

    Ok(())
}
