//! CLI argument definitions

use crate::config::ColorChoice;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Replay recorded browser interaction sequences
#[derive(Parser, Debug)]
#[command(name = "repasador", version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a script against a live browser
    Run(RunArgs),

    /// Parse and validate scripts without launching a browser
    Validate(ValidateArgs),
}

/// Arguments for the `run` subcommand
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script file (YAML or JSON)
    pub script: PathBuf,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Path to the chromium binary
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,

    /// Disable the browser sandbox (for containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Viewport width
    #[arg(long, default_value_t = 1280)]
    pub viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value_t = 720)]
    pub viewport_height: u32,

    /// Write the run report to a file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Arguments for the `validate` subcommand
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Script files to validate
    #[arg(required = true)]
    pub scripts: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Line-oriented text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Color flag values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorArg {
    /// Use colors when output is a terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["repasador", "run", "checkout.yaml"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.script, PathBuf::from("checkout.yaml"));
                assert!(!args.headed);
                assert_eq!(args.viewport_width, 1280);
                assert_eq!(args.format, ReportFormat::Text);
            }
            Commands::Validate(_) => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_parse_validate_multiple() {
        let cli =
            Cli::try_parse_from(["repasador", "validate", "a.yaml", "b.json", "--format", "json"])
                .unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.scripts.len(), 2);
                assert_eq!(args.format, ReportFormat::Json);
            }
            Commands::Run(_) => panic!("expected validate subcommand"),
        }
    }

    #[test]
    fn test_validate_requires_a_script() {
        assert!(Cli::try_parse_from(["repasador", "validate"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["repasador", "-vv", "--color", "never", "run", "s.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.color, ColorArg::Never);
    }

    #[test]
    fn test_color_arg_conversion() {
        assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
        assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
    }
}
