//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Lexguard CLI - Ask compliance questions against a store of legal provisions.
#[derive(Debug, Parser)]
#[command(name = "lexguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Database file path
    #[arg(short, long, global = true, env = "LEXGUARD_DATABASE")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a compliance question
    Analyze(AnalyzeArgs),

    /// Import provisions from a JSON file
    Import(ImportArgs),

    /// List recent audit records
    Audit(AuditArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// The question to analyze
    pub query: String,

    /// Jurisdiction to favour during retrieval (e.g., Germany)
    #[arg(short, long)]
    pub jurisdiction: Option<String>,

    /// Log audit records instead of writing them to the database
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// JSON file containing an array of provisions
    pub file: String,
}

/// Arguments for the audit command.
#[derive(Debug, Parser)]
pub struct AuditArgs {
    /// Maximum number of records
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Show the query history instead of compliance events
    #[arg(long)]
    pub queries: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
