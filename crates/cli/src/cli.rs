use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bulk import of exported alert rules into a business group.
#[derive(Parser, Debug)]
#[command(name = "ruleport", version, about = "Bulk import of exported alert rules")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the inferred category, overridable parameters and validation
    /// findings of an export without importing it.
    Inspect(InspectArgs),

    /// Import an export into a business group.
    Import(ImportArgs),

    /// Print the effective configuration as JSON (the API token is never shown).
    Config,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Exported rules file (`-` reads stdin).
    #[arg(long, short)]
    pub file: PathBuf,

    /// Print the preview as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Exported rules file (`-` reads stdin).
    #[arg(long, short)]
    pub file: PathBuf,

    /// Target business group id.
    #[arg(long, short, env = "RULEPORT_GROUP")]
    pub group: i64,

    /// Datasource category for the batch. Only needed when none can be
    /// inferred from the export.
    #[arg(long)]
    pub category: Option<String>,

    /// Create the rules enabled (default comes from RULEPORT_DEFAULT_ENABLED).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub enabled: Option<bool>,

    /// Parameter overrides as a JSON array of
    /// `{"param_val_ids": [..], "query": ..}`, or `@path` to read a file.
    #[arg(long)]
    pub overrides: Option<String>,

    /// Use each parameter's exported values instead of clearing parameters
    /// without an override.
    #[arg(long)]
    pub keep_values: bool,

    /// Datasource selection for the imported rules as JSON, or `@path`.
    #[arg(long)]
    pub datasource_queries: Option<String>,

    /// Rule service URL (overrides RULEPORT_URL).
    #[arg(long)]
    pub server: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}
