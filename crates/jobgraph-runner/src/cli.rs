use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "jobgraph")]
#[command(about = "Compile job scripts and workflow definitions into deployment descriptors")]
pub struct Cli {
    /// Lift the default log level to debug.
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Build every job and workflow and write the deployment manifest.
    Synth(SynthCommand),
    /// List the job artifacts found under the jobs directory.
    Discover(DiscoverCommand),
    /// Run the full pipeline without writing anything.
    Validate(ValidateCommand),
}

#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where the inputs live. Shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Base directory for relative paths; overrides the config file's directory.
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct SynthCommand {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, clap::Args)]
pub struct DiscoverCommand {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
