mod help_text;

use crate::report::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Compare the metadata of two directory trees
#[derive(Parser, Debug)]
#[command(
    name = "treecmp",
    version,
    about,
    long_about = help_text::ROOT_LONG_ABOUT,
    after_long_help = help_text::ROOT_AFTER_LONG_HELP
)]
pub struct Cli {
    /// Configuration file (JSON, or TOML if it ends in .toml)
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Change to DIRECTORY before doing anything
    #[arg(short = 'C', value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Left directory (overrides left_dir from the config file)
    #[arg(short, long, value_name = "DIR")]
    pub left: Option<PathBuf>,

    /// Right directory (overrides right_dir from the config file)
    #[arg(short, long, value_name = "DIR")]
    pub right: Option<PathBuf>,

    /// Also list entries that are unchanged
    #[arg(short, long)]
    pub all: bool,

    /// Output format of the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug). Takes precedence over RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "log_level")]
    pub verbose: u8,

    /// Set the log level explicitly. Takes precedence over RUST_LOG.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
