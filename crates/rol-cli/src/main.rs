mod commands;
mod output;
mod server;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rol_core::config::{load_config, validate_config, PipelineConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rol",
    version,
    about = "Download the procedure-coverage annexes and turn the annex table into a packaged CSV"
)]
struct Cli {
    /// JSON pipeline config (defaults are used when omitted)
    #[arg(long, env = "ROL_CONFIG", global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the download root directory
    #[arg(long, env = "ROL_DOWNLOAD_ROOT", global = true, value_name = "DIR")]
    download_root: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "ROL_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
    /// Download the annexes, archive them and extract the archive
    Acquire {
        /// Output format: json (default) or text
        #[arg(short, long, default_value = "json")]
        output: String,
    },
    /// Extract the annex table, expand coverage codes and package the CSV
    Process {
        /// Output format: json (default) or text
        #[arg(short, long, default_value = "json")]
        output: String,
    },
    /// List the download root
    List {
        /// Output format: json (default) or text
        #[arg(short, long, default_value = "json")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(cli.config.as_deref(), cli.download_root)?;

    let succeeded = match cli.command {
        Commands::Serve { bind } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime.block_on(commands::serve::run(config, bind))?;
            true
        }
        Commands::Acquire { output } => commands::acquire::run(&config, &output)?,
        Commands::Process { output } => commands::process::run(&config, &output)?,
        Commands::List { output } => commands::list::run(&config, &output)?,
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_config(
    path: Option<&std::path::Path>,
    download_root: Option<PathBuf>,
) -> anyhow::Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(root) = download_root {
        config.download_root = root;
    }
    validate_config(&config)?;
    Ok(config)
}
