//! CLI argument definitions for the dua browser.

use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use dua_client::DEFAULT_BASE_URL;

use crate::logging::{LogConfig, LogFormat};
use crate::repl::BrowseConfig;

#[derive(Parser)]
#[command(
    name = "dua",
    version,
    about = "Dua browser - serve, seed, inspect and browse a dua corpus",
    long_about = "Serve a read-only dua corpus over HTTP and browse it from the terminal.\n\n\
                  The corpus is a SQLite database of categories, subcategories and duas.\n\
                  Use `seed` to build one from JSON and `inspect` to check its contents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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

    /// Omit timestamps from pretty and compact log lines.
    #[arg(long = "log-no-time", global = true)]
    pub log_no_time: bool,

    /// Include the module path of each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

impl Cli {
    /// Build logging configuration from CLI flags with consistent precedence.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            ..LogConfig::default()
        };
        config.use_env_filter = !(self.verbosity.is_present() || self.log_level.is_some());
        if let Some(level) = self.log_level {
            config.level_filter = match level {
                LogLevelArg::Error => LevelFilter::ERROR,
                LogLevelArg::Warn => LevelFilter::WARN,
                LogLevelArg::Info => LevelFilter::INFO,
                LogLevelArg::Debug => LevelFilter::DEBUG,
                LogLevelArg::Trace => LevelFilter::TRACE,
            };
        }
        config.format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        config.with_timestamps = !self.log_no_time;
        config.with_target = self.log_target;
        config.log_file = self.log_file.clone();
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the query API over HTTP.
    Serve(ServeArgs),

    /// Build a database from a JSON seed file.
    Seed(SeedArgs),

    /// List tables, columns and row counts of a database.
    Inspect(InspectArgs),

    /// Browse a running API from the terminal.
    Browse(BrowseArgs),
}

#[derive(Parser)]
pub struct ServeArgs {
    /// Address to listen on (default 0.0.0.0:3001, or DUA_BIND).
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// SQLite database to serve (default dua_main.sqlite, or DUA_DATABASE).
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// TOML file with server settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SeedArgs {
    /// Database file to create.
    #[arg(long, value_name = "PATH")]
    pub database: PathBuf,

    /// JSON seed with `categories`, `subcategories` and `duas` arrays.
    #[arg(long = "from", value_name = "SEED_JSON")]
    pub from: PathBuf,

    /// Replace the database if it already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Database file to inspect.
    #[arg(long, value_name = "PATH")]
    pub database: PathBuf,

    /// Print the summary as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct BrowseArgs {
    /// Base URL of the query API.
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub api: String,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Delay between typing and searching, in milliseconds.
    #[arg(long = "debounce-ms", value_name = "MS", default_value_t = 300)]
    pub debounce_ms: u64,
}

impl BrowseArgs {
    pub fn config(&self) -> BrowseConfig {
        BrowseConfig {
            api: self.api.clone(),
            timeout: Duration::from_secs(self.timeout),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
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
