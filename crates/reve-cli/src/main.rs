//! Reve CLI - Command-line interface for the Reve image generation API
//!
//! Entry point for the `reve` binary: create, edit and remix images, price
//! calls offline, and inspect the effective configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::LoggingConfig;
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Pick up REVE_* variables from a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    control::set_override(cli.use_color());

    match run(cli).await {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_with_file(cli.config.as_deref())?;
    config.merge_cli(&cli);

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    dispatch(cli, config).await
}

#[instrument(skip_all, fields(command = ?cli.command))]
async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let mut output = OutputWriter::new(cli.json, cli.use_color(), cli.quiet);

    tracing::info!(verbosity = cli.verbosity_level(), "Executing command");

    match cli.command {
        Commands::Create(args) => handlers::handle_create(args, &config, &mut output).await,
        Commands::Edit(args) => handlers::handle_edit(args, &config, &mut output).await,
        Commands::Remix(args) => handlers::handle_remix(args, &config, &mut output).await,
        Commands::Estimate(args) => handlers::handle_estimate(args, &mut output).await,
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output).await,
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    // -v flags take precedence over the file's level
    if cli.verbosity_level() == 0 {
        logging_config.merge_with_file(&config.logging);
    }
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["reve", "-vv", "create", "a red fox"]);
        assert_eq!(cli.verbosity_level(), 2);
        assert!(matches!(cli.command, Commands::Create(_)));

        let cli = Cli::parse_from(["reve", "--quiet", "estimate", "remix", "--fast"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(cli.quiet);

        let cli = Cli::parse_from(["reve", "remix", "blend", "-i", "a.png", "-i", "b.png"]);
        match cli.command {
            Commands::Remix(args) => assert_eq!(args.images.len(), 2),
            other => panic!("expected remix, got {other:?}"),
        }
    }
}
