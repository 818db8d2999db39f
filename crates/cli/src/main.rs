mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use teamsfx_lib::config::Platform;
use teamsfx_lib::consts::APP_NAME;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// teamsfx - upgrade legacy Teams Toolkit projects to the unified config layout
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Check whether a project still uses separate local and remote templates
  Check {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Treat the unified config feature as enabled
    #[arg(long)]
    unify: bool,
  },

  /// Consolidate local and remote config into the unified layout
  Upgrade {
    /// Project root (default: current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Upgrade without prompting
    #[arg(short, long)]
    yes: bool,

    /// Treat the unified config feature as enabled
    #[arg(long)]
    unify: bool,

    /// Message wording to use (vscode or cli)
    #[arg(long)]
    platform: Option<Platform>,

    /// Host operation that triggered the upgrade
    #[arg(long)]
    operation: Option<String>,
  },

  /// Compare two manifest templates, ignoring names, URLs and schema markers
  Diff {
    /// Local manifest template
    local: PathBuf,

    /// Remote manifest template
    remote: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "info" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Check { path, unify } => cmd::cmd_check(&path, unify, cli.output),
    Commands::Upgrade {
      path,
      yes,
      unify,
      platform,
      operation,
    } => cmd::cmd_upgrade(
      &path,
      &cmd::UpgradeArgs {
        yes,
        unify,
        platform,
        operation,
      },
      cli.output,
    ),
    Commands::Diff { local, remote } => cmd::cmd_diff(&local, &remote, cli.output),
  }
}
