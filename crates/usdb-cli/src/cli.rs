use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "usdb",
    about = "usdb -- drive the scene bridge device from scripted object calls",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a scene script and print the status log and resulting document
    Run(RunArgs),
    /// List every data type tag and its document attribute type
    Types(TypesArgs),
    /// Print the effective device configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to the JSON scene script
    pub script: PathBuf,
    /// TOML device configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Run without a scene bridge; commits become no-ops
    #[arg(long)]
    pub no_bridge: bool,
    /// Exit with an error if any error-severity status was reported
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct TypesArgs {
    /// Show only tags that map to a document attribute type
    #[arg(long)]
    pub defined: bool,
    /// Apply the flattened mapping used for bulk field data
    #[arg(long)]
    pub flattened: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML device configuration to load instead of the defaults
    pub path: Option<PathBuf>,
}
