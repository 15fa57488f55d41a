//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trendchart")]
#[command(author, version, about = "Stock trendline and price channel charts")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level, overriding `logging.level` from the configuration
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Standalone HTML page
    Html,
    /// Response document on stdout
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chart up to five symbols side by side
    Batch(BatchArgs),
    /// Chart one symbol with optional moving averages
    Chart(ChartArgs),
    /// Plain candlestick chart over a date range
    Candles(CandlesArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct BatchArgs {
    /// Symbols to chart (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "html")]
    pub format: OutputFormat,

    /// HTML output file
    #[arg(short, long, default_value = "charts.html")]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct ChartArgs {
    /// Symbol to chart
    pub symbol: String,

    /// Overlay the 20-day moving average
    #[arg(long)]
    pub ma20: bool,

    /// Overlay the 50-day moving average
    #[arg(long)]
    pub ma50: bool,

    /// Output format
    #[arg(short, long, default_value = "html")]
    pub format: OutputFormat,

    /// HTML output file
    #[arg(short, long, default_value = "chart.html")]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct CandlesArgs {
    /// Symbol to chart
    #[arg(short = 'S', long, default_value = "TSLA")]
    pub symbol: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-12-01")]
    pub start: String,

    /// End date (YYYY-MM-DD), today when omitted
    #[arg(long)]
    pub end: Option<String>,

    /// HTML output file
    #[arg(short, long, default_value = "candles.html")]
    pub output: PathBuf,
}
