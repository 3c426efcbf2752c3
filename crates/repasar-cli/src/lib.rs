//! Repasador: command-line interface for replaying recorded browser
//! interaction sequences.
//!
//! ## Usage
//!
//! ```bash
//! repasador run checkout.yaml            # Replay a recorded script
//! repasador run checkout.yaml --headed   # Watch the browser while it runs
//! repasador validate scripts/*.yaml      # Parse and validate without a browser
//! ```

#![warn(missing_docs)]

/// CLI argument definitions
pub mod commands;

/// CLI configuration
pub mod config;

/// Error types
pub mod error;

/// Output formatting and progress reporting
pub mod output;

pub use commands::{Cli, ColorArg, Commands, ReportFormat, RunArgs, ValidateArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
