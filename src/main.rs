mod cli;
mod config;
mod diff;
mod record;
mod report;
mod scan;

use anyhow::Context;
use cli::{Cli, LogLevel};
use config::{Config, Overrides, Side};
use std::fmt as stdfmt;
use std::io::{IsTerminal, Write, stderr, stdout};
use std::path::Path;
use std::process::ExitCode;
use tracing::{Event, Level, Subscriber, debug, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

struct CompareExitCode;

impl CompareExitCode {
    /// Exit code used when the trees differ.
    fn differences_found() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used for other errors (I/O errors, invalid configuration, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    // Change working directory if -C was specified
    if let Some(directory) = &cli.directory
        && let Err(e) = std::env::set_current_dir(directory)
    {
        error!(
            "Failed to change directory to {}: {}",
            directory.display(),
            e
        );
        return CompareExitCode::any_error();
    }

    match run(cli) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err:#}");
            CompareExitCode::any_error()
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let overrides = Overrides {
        left_dir: cli.left,
        right_dir: cli.right,
        show_unchanged: cli.all,
    };
    let config = Config::load(cli.config.as_deref(), overrides)?;

    info!(
        "Comparing {} with {}",
        config.left_dir.display(),
        config.right_dir.display()
    );

    let left = scan_side(Side::Left, &config.left_dir)?;
    let right = scan_side(Side::Right, &config.right_dir)?;

    let records = diff::compare(left, right);
    let summary = report::Summary::from_records(&records);

    let output = report::render(&records, cli.format, config.show_unchanged)
        .context("Failed to render report")?;
    stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("Failed to write report")?;

    if summary.has_differences() {
        Ok(CompareExitCode::differences_found())
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn scan_side(side: Side, root: &Path) -> anyhow::Result<scan::Snapshot> {
    let snapshot =
        scan::scan(root).with_context(|| format!("Failed to scan the {side} directory"))?;

    if snapshot.is_empty() {
        info!("The {side} directory is empty");
    }

    let skipped = snapshot.skipped();
    if !skipped.is_empty() {
        info!(
            "{} entries in the {} directory could not be read",
            skipped.len(),
            side
        );
        for entry in skipped {
            debug!("  {}: {}", entry.path.display(), entry.reason);
        }
    }

    Ok(snapshot)
}

fn log_filter(verbose: u8, log_level: Option<LogLevel>) -> EnvFilter {
    let explicit_level = match (log_level, verbose) {
        (Some(level), _) => Some(level.as_filter()),
        (None, 0) => None,
        (None, 1) => Some("info"),
        (None, _) => Some("debug"),
    };

    match explicit_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    }
}

fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(log_filter(verbose, log_level))
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::ERROR => write!(writer, "❌️ ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::INFO => write!(writer, "ℹ️ ")?,
                _ => write!(writer, "🔍 ")?,
            }
        } else {
            match *event.metadata().level() {
                Level::ERROR => writer.write_str("ERROR: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                _ => writer.write_str("TRACE: ")?,
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::log_filter;
    use crate::cli::LogLevel;

    #[test]
    fn explicit_log_level_is_used_verbatim() {
        assert_eq!(
            log_filter(0, Some(LogLevel::Trace)).to_string(),
            "trace".to_string()
        );
    }

    #[test]
    fn verbose_count_maps_to_levels() {
        assert_eq!(log_filter(1, None).to_string(), "info");
        assert_eq!(log_filter(2, None).to_string(), "debug");
        assert_eq!(log_filter(5, None).to_string(), "debug");
    }
}
