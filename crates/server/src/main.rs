//! mdocs
//!
//! Markdown documentation server.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mdocs_server::config::{default_config_path, Config};
use mdocs_server::docs::DocumentStore;
use mdocs_server::http;
use mdocs_server::logging;

/// mdocs - serve a directory of Markdown documentation.
#[derive(Parser, Debug)]
#[command(name = "mdocs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// List available documents
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Render one document to stdout
    Render {
        /// Document name, with or without the .md extension
        name: String,

        /// Print the Markdown source instead of HTML
        #[arg(long)]
        raw: bool,
    },

    /// Write the effective configuration to a file
    InitConfig {
        /// Destination (defaults to the user config directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Flags of the `serve` command. They override file and environment values.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Directory holding the Markdown documents
    #[arg(long, value_name = "DIR")]
    pub docs_dir: Option<PathBuf>,

    /// Directory holding the static viewer
    #[arg(long, value_name = "DIR")]
    pub public_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.docs_dir {
            config.docs.docs_dir = dir.clone();
        }
        if let Some(dir) = &self.public_dir {
            config.docs.public_dir = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => Config::load(config_path)?,
        None => Config::load_default()?,
    };

    // Apply environment variable overrides, then flags
    let overrides = config.apply_env_overrides();
    if let Commands::Serve(args) = &cli.command {
        args.apply(&mut config);
    }

    // Validate configuration
    config.validate()?;

    let _log_guard = logging::init(&config.logging, cli.verbose)?;

    if let Some(config_path) = &cli.config {
        tracing::info!("Using config file: {:?}", config_path);
    }
    for var in &overrides.applied {
        tracing::info!("Applied {} from environment", var);
    }
    for (var, value) in &overrides.rejected {
        tracing::warn!("Ignoring unparsable {} value: {:?}", var, value);
    }

    match cli.command {
        Commands::Serve(_) => {
            http::run(&config, wait_for_shutdown_signal()).await?;
        }
        Commands::List { json } => {
            let store = DocumentStore::new(&config.docs.docs_dir)?;
            let docs = store
                .list()
                .await
                .with_context(|| format!("Failed to list {}", store.docs_dir().display()))?;

            if json {
                println!("{}", mdocs_protocol::to_json_pretty(&docs)?);
            } else if docs.is_empty() {
                println!("No documentation found.");
            } else {
                print_docs_table(&docs);
            }
        }
        Commands::Render { name, raw } => {
            let store = DocumentStore::new(&config.docs.docs_dir)?;
            if raw {
                let (_, content) = store
                    .read(&name)
                    .await
                    .with_context(|| format!("Failed to read {:?}", name))?;
                print!("{}", content);
            } else {
                let doc = store
                    .load(&name)
                    .await
                    .with_context(|| format!("Failed to render {:?}", name))?;
                print!("{}", doc.html);
            }
        }
        Commands::InitConfig { output, force } => {
            let path = output.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            config.save(&path)?;
            println!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Print the document list as an aligned table.
fn print_docs_table(docs: &[mdocs_protocol::DocumentDescriptor]) {
    let width = docs
        .iter()
        .map(|doc| doc.filename.len())
        .max()
        .unwrap_or(0)
        .max("FILENAME".len());

    println!("{:<width$}  TITLE", "FILENAME", width = width);
    for doc in docs {
        println!("{:<width$}  {}", doc.filename, doc.title, width = width);
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM");
                    }
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT");
                    }
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to register signal handlers: {}; using Ctrl+C", e);
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C");
}
