//! SpotFinder command-line interface.
//!
//! # Usage
//!
//! ```bash
//! spotfinder predict -w mon -H 8 -m 30
//! spotfinder predict12h -w fri -H 5 --pm --json
//! spotfinder now
//! spotfinder encode -w sat -H 14
//! spotfinder nav splash map menu forecast back
//! ```
//!
//! Logs go to stderr; forecasts go to stdout.

use std::io;
use std::process;

use anyhow::Result;
use clap::Parser;
use spotfinder_forecast::config::LoggingConfig;
use spotfinder_forecast::{ForecastConfig, InferenceConfig};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;
mod navigation;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if !needs_config(&cli.command) {
        init_logging(&LoggingConfig::default().level, cli.verbose);
        let exit_code = match cli.command {
            Commands::Nav(ref args) => commands::handle_nav(args),
            _ => commands::EXIT_ERROR,
        };
        process::exit(exit_code);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(commands::EXIT_ERROR);
        }
    };

    init_logging(&config.logging.level, cli.verbose);
    info!(
        assets = %config.assets.dir.display(),
        accelerator = config.inference.use_accelerator,
        "SpotFinder starting"
    );

    let exit_code = match cli.command {
        Commands::Predict(args) => commands::handle_predict(&config, args),
        Commands::Predict12h(args) => commands::handle_predict_12h(&config, args),
        Commands::Now(args) => commands::handle_now(&config, args),
        Commands::Encode(args) => commands::handle_encode(&config, args),
        Commands::Nav(args) => commands::handle_nav(&args),
    };

    debug!(exit_code, "SpotFinder finished");
    process::exit(exit_code);
}

/// The navigation replay is self-contained; a broken config must not stop it.
fn needs_config(command: &Commands) -> bool {
    !matches!(command, Commands::Nav(_))
}

/// Resolve configuration, then apply command-line overrides.
fn load_config(cli: &Cli) -> Result<ForecastConfig> {
    let mut config = match cli.config {
        Some(ref path) => ForecastConfig::from_file(path)?,
        None => ForecastConfig::load()?,
    };

    if let Some(ref dir) = cli.assets {
        config.assets.dir = dir.clone();
    }
    if cli.cpu {
        config.inference = InferenceConfig::cpu();
    }

    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` wins; otherwise the configured level, raised by `-v`.
fn init_logging(configured: &str, verbose: u8) {
    let level = match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_skips_config_resolution() {
        let dir = tempfile::tempdir().expect("tempdir");
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[assets\nmodel_file = ").expect("write config");
        let config_arg = broken.to_string_lossy().into_owned();

        let nav = Cli::try_parse_from(["spotfinder", "--config", config_arg.as_str(), "nav", "splash"])
            .expect("parses");
        assert!(!needs_config(&nav.command));

        let predict = Cli::try_parse_from([
            "spotfinder", "--config", config_arg.as_str(), "predict", "-w", "mon", "-H", "8",
        ])
        .expect("parses");
        assert!(needs_config(&predict.command));
        assert!(load_config(&predict).is_err(), "broken config must fail forecast commands");
    }
}
