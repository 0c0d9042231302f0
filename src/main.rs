use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use workpilot::{cli, config, server};

#[derive(Parser)]
#[command(
    name = "workpilot",
    version,
    about = "Turn daily work logs into weekly reports and OKRs"
)]
struct Cli {
    /// Config file (default: ~/.workpilot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API with MCP mounted at /mcp
    Serve,
    /// Start the MCP server (stdio transport)
    Mcp,
    /// Parse a daily log and show categorised entries
    Parse {
        /// Daily log file, or - for stdin
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check a generated weekly report or OKR
    Validate {
        #[command(subcommand)]
        target: ValidateTarget,
    },
    /// Draft a weekly report or OKR
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },
    /// Check configuration and database health
    Doctor,
    /// Export the ledger as JSON to stdout
    Export,
}

#[derive(Subcommand)]
enum ValidateTarget {
    /// Weekly report section markers and order
    Report {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// OKR objectives, dated nodes, and quantitative targets
    Okr {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Weekly report from a daily log
    Report {
        file: PathBuf,
        /// Use the built-in mock model
        #[arg(long)]
        mock: bool,
    },
    /// Next quarter's OKR from reports or notes
    Okr {
        file: PathBuf,
        /// Quarter label, e.g. 2026第二季度 (default: report.default_quarter)
        #[arg(long)]
        quarter: Option<String>,
        #[arg(long)]
        mock: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let config = config::WorkPilotConfig::load_from(&config_path)?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC and CLI output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve_http(config).await?,
        Command::Mcp => server::serve_stdio(config).await?,
        Command::Parse { file, json } => cli::parse::parse(&config, &file, json)?,
        Command::Validate { target } => {
            let valid = match target {
                ValidateTarget::Report { file, json } => cli::validate::report(&file, json)?,
                ValidateTarget::Okr { file, json } => cli::validate::okr(&file, json)?,
            };
            if !valid {
                std::process::exit(1);
            }
        }
        Command::Generate { target } => {
            // The blocking HTTP client must not run on the async runtime.
            tokio::task::spawn_blocking(move || match target {
                GenerateTarget::Report { file, mock } => {
                    cli::generate::weekly(&config, &file, mock)
                }
                GenerateTarget::Okr {
                    file,
                    quarter,
                    mock,
                } => cli::generate::okr(&config, &file, quarter.as_deref(), mock),
            })
            .await??;
        }
        Command::Doctor => cli::doctor::doctor(&config, &config_path)?,
        Command::Export => cli::export::export(&config)?,
    }

    Ok(())
}
