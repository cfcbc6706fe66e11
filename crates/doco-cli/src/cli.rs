//! CLI argument definitions for the DOCO replay tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "doco",
    version,
    about = "DOCO state core - replay presentation intents",
    long_about = "Drive the DOCO application-state core from a TOML intent script.\n\n\
                  The script fixes what the auth provider and document source answer;\n\
                  every intent is applied in order and the final snapshot is printed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay an intent script and print the resulting snapshot.
    Replay(ReplayArgs),

    /// List the UI flags the core accepts.
    Flags(FlagsArgs),
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// Path to the TOML intent script.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Core configuration file (TOML). Defaults apply when omitted.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for the replay report.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Exit with status 1 if any intent was rejected.
    #[arg(long = "fail-on-rejected")]
    pub fail_on_rejected: bool,
}

#[derive(Parser)]
pub struct FlagsArgs {
    /// Core configuration file (TOML) whose UI defaults are shown.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Text,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
