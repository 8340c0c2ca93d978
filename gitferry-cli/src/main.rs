//! Gitferry CLI - import external Git repositories into GitHub
//!
//! Reads a manifest of (source, destination) URL pairs and mirrors each
//! source repository into its destination, creating destinations on the
//! hosting platform when they are missing.

mod commands;

use clap::{Parser, Subcommand};
use gitferry_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{CheckArgs, ImportArgs};

/// Gitferry: mirror external Git repositories into GitHub
#[derive(Parser, Debug)]
#[command(name = "gitferry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the git executable (overrides config and env)
    #[arg(long, global = true, env = "GITFERRY_GIT_PATH")]
    git_path: Option<String>,

    /// Path to the gh executable (overrides config and env)
    #[arg(long, global = true, env = "GITFERRY_GH_PATH")]
    gh_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Import the repositories listed in a manifest file
    #[command(visible_alias = "i")]
    Import(ImportArgs),

    /// Validate a manifest file without touching any repository
    Check(CheckArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.git_path.clone(), cli.gh_path.clone())?;

    if cli.verbose {
        tracing::info!(
            git_path = %config.tools.git_path,
            gh_path = %config.tools.gh_path,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("gitferry {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Import(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Check(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Config) => {
            println!("Gitferry Configuration");
            println!("======================");
            println!();
            println!("Import defaults:");
            println!("  visibility: {}", config.import.visibility);
            println!(
                "  organization: {}",
                config
                    .import
                    .organization
                    .as_deref()
                    .unwrap_or("(personal account)")
            );
            println!("  archive: {}", config.import.archive);
            println!();
            println!("Tools:");
            println!("  git_path: {}", config.tools.git_path);
            println!("  gh_path: {}", config.tools.gh_path);
            println!(
                "  workspace_dir: {}",
                config
                    .tools
                    .workspace_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(system temp)".to_string())
            );
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Gitferry - mirror external Git repositories into GitHub");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
