mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;
use stride_core::types::FileKind;

#[derive(Parser)]
#[command(
    name = "stride",
    about = "Incrementally sync fitness activities into per-account databases and exports",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root: workspaces land under <root>/data, artifacts under <root>/public
    #[arg(long, global = true, env = "STRIDE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync every configured account from the remote service
    Sync {
        /// Path to the accounts config file
        #[arg(long, default_value = "users.yaml")]
        config: PathBuf,

        /// Restrict the sync to running activities
        #[arg(long)]
        only_run: bool,

        /// Raw file format to download: fit, gpx, or tcx
        #[arg(long, default_value = "fit")]
        file_kind: FileKind,
    },

    /// Rebuild per-account artifacts from existing workspaces (no network)
    Build {
        /// Path to the accounts config file
        #[arg(long, default_value = "users.yaml")]
        config: PathBuf,

        /// Rebuild a single account instead of all of them
        #[arg(long)]
        account: Option<String>,

        /// Raw file format the workspaces hold
        #[arg(long, default_value = "fit")]
        file_kind: FileKind,
    },

    /// Scan a raw-file directory and tabulate its contents
    Stats {
        /// Directory of raw activity files
        dir: PathBuf,
    },

    /// Inspect the accounts config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Sync { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let result = match cli.command {
        Commands::Sync {
            config,
            only_run,
            file_kind,
        } => cmd::sync::run(&root, &config, only_run, file_kind, cli.json),
        Commands::Build {
            config,
            account,
            file_kind,
        } => cmd::build::run(&root, &config, account.as_deref(), file_kind, cli.json),
        Commands::Stats { dir } => cmd::stats::run(&dir, cli.json),
        Commands::Config { subcommand } => cmd::config::run(subcommand, cli.json),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
