//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (probe, init, validate), and their associated argument
//! structs. Every flag has an environment variable equivalent for CI
//! use.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "loadmark",
    version,
    about = "Trace-context tagging for synthetic HTTP load-test traffic",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        loadmark init                        Create a starter scenario\n  \
        loadmark validate                    Check ./loadmark.yaml\n  \
        loadmark probe                       Fire each task once, tagged"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fire each scenario task once and report the attached headers
    Probe(Box<ProbeArgs>),

    /// Generate a starter scenario file
    Init(InitArgs),

    /// Validate a scenario file without sending anything
    Validate(ValidateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        loadmark probe                                 Auto-detect scenario\n  \
        loadmark probe -c shop.yaml                    Specific scenario file\n  \
        loadmark probe -c shop.yaml --task browse      Single task\n  \
        loadmark probe --dry-run --json                Preview headers as JSON")]
pub struct ProbeArgs {
    /// Scenario file path (.yaml, .json, .toml)
    #[arg(short, long, env = "SCENARIO_FILE")]
    pub config: Option<PathBuf>,

    /// Only probe the named task
    #[arg(short, long)]
    pub task: Option<String>,

    /// Send each task this many times
    #[arg(long, default_value_t = 1)]
    pub repeat: u32,

    /// Compute headers without sending anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Override the scenario's base URL
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json_logs: bool,

    // -- Tuning --
    /// Per-request timeout in milliseconds (overrides scenario defaults)
    #[arg(long, env = "REQUEST_TIMEOUT_MS", help_heading = "Tuning")]
    pub timeout: Option<u64>,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        loadmark init                            Quick start scenario (yaml)\n  \
        loadmark init -f toml -o shop.toml       TOML format\n  \
        loadmark init --full                     Starter with every option spelled out")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include every optional field in the starter scenario
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Scenario file to validate
    #[arg(default_value = "loadmark.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
