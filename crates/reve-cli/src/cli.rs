//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Reve CLI - generate, edit and remix images with the Reve API
#[derive(Parser, Debug)]
#[command(
    name = "reve",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file (YAML or JSON)
    #[arg(short, long, global = true, env = "REVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// API key
    #[arg(long, global = true, env = "REVE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the API
    #[arg(long, global = true, env = "REVE_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true, env = "REVE_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Retries after the first attempt on transient failures
    #[arg(long, global = true, env = "REVE_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// HTTP(S) proxy URL
    #[arg(long, global = true, conflicts_with = "socks5")]
    pub proxy: Option<String>,

    /// SOCKS5 proxy as host:port
    #[arg(long, global = true)]
    pub socks5: Option<String>,

    /// Print each request and response line to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit machine-readable JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an image from a text prompt
    Create(CreateArgs),

    /// Edit an image with a text instruction
    Edit(EditArgs),

    /// Combine reference images under a prompt
    Remix(RemixArgs),

    /// Estimate the credit cost of a call without sending it
    Estimate(EstimateArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

/// Options shared by every generation command
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Aspect ratio (16:9, 9:16, 3:2, 2:3, 4:3, 3:4, 1:1, auto)
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Model version, e.g. latest or reve-create@20250915
    #[arg(long)]
    pub model: Option<String>,

    /// Test-time scaling factor (1-15)
    #[arg(long)]
    pub scaling: Option<f64>,

    /// Upscale the result by 2, 3 or 4
    #[arg(long)]
    pub upscale: Option<u32>,

    /// Remove the background of the result
    #[arg(long)]
    pub remove_background: bool,

    /// Output file; a timestamped name is used when omitted
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Response format; detected from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Tracing token forwarded to the service
    #[arg(long)]
    pub breadcrumb: Option<String>,
}

/// Arguments for the create command
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Text prompt
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments for the edit command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Edit instruction
    #[arg(value_name = "INSTRUCTION")]
    pub instruction: String,

    /// Image to edit
    #[arg(short, long, value_name = "IMAGE")]
    pub image: PathBuf,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments for the remix command
#[derive(Parser, Debug)]
pub struct RemixArgs {
    /// Prompt; refer to reference images as <img>0</img>, <img>1</img>, ...
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    /// Reference image (repeat up to 6 times)
    #[arg(short, long = "image", value_name = "IMAGE", required = true)]
    pub images: Vec<PathBuf>,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Arguments for the estimate command
#[derive(Parser, Debug)]
pub struct EstimateArgs {
    /// Operation to price
    #[arg(value_enum)]
    pub operation: Operation,

    /// Price the fast model variant (edit and remix only)
    #[arg(long)]
    pub fast: bool,

    /// Test-time scaling factor
    #[arg(long, default_value = "1")]
    pub scaling: f64,

    /// Include an upscale step
    #[arg(long)]
    pub upscale: Option<u32>,

    /// Include a background removal step
    #[arg(long)]
    pub remove_background: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration with secrets redacted
    Show(ConfigShowArgs),
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Operations that can be priced
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Create,
    Edit,
    Remix,
}

/// Response formats selectable on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Base64 inside JSON, decoded before saving
    Json,
    Png,
    Jpeg,
    Webp,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        use is_terminal::IsTerminal;
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
    }
}

impl From<FormatArg> for reve_core::OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => reve_core::OutputFormat::Json,
            FormatArg::Png => reve_core::OutputFormat::Png,
            FormatArg::Jpeg => reve_core::OutputFormat::Jpeg,
            FormatArg::Webp => reve_core::OutputFormat::Webp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_parsing() {
        let cli = Cli::parse_from([
            "reve",
            "-vv",
            "create",
            "a red fox",
            "--aspect-ratio",
            "16:9",
            "--upscale",
            "2",
            "-o",
            "fox.webp",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.prompt, "a red fox");
                assert_eq!(args.generation.aspect_ratio.as_deref(), Some("16:9"));
                assert_eq!(args.generation.upscale, Some(2));
                assert_eq!(args.generation.out, Some(PathBuf::from("fox.webp")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_remix_requires_images() {
        assert!(Cli::try_parse_from(["reve", "remix", "mix"]).is_err());

        let cli = Cli::try_parse_from([
            "reve", "remix", "mix", "-i", "a.png", "--image", "b.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Remix(args) => assert_eq!(args.images.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_quiet_overrides_verbosity() {
        let cli = Cli::parse_from(["reve", "--quiet", "estimate", "create"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(Cli::try_parse_from(["reve", "-q", "-v", "estimate", "create"]).is_err());
    }

    #[test]
    fn test_proxy_flags_conflict() {
        assert!(Cli::try_parse_from([
            "reve",
            "--proxy",
            "http://p:8080",
            "--socks5",
            "127.0.0.1:1080",
            "estimate",
            "create"
        ])
        .is_err());
    }
}
