//! CLI parser and command dispatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;
use crate::extract;
use crate::fetch::{ChromiumFetcher, HttpAssetClient};
use crate::server;

#[derive(Parser)]
#[command(name = "brandscout")]
#[command(about = "Business brand metadata extraction service")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Run the extraction HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Extract business metadata from one URL and print it as JSON
    Extract {
        /// Website URL (scheme optional)
        url: String,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);
            server::serve(settings, &host, port).await
        }
        Commands::Extract { url, pretty } => {
            let assets = HttpAssetClient::new(&settings.http);
            let mut fetcher = ChromiumFetcher::new(settings.browser.clone());
            let profile = extract::extract_business(&mut fetcher, &assets, &url).await?;

            let rendered = if pretty {
                serde_json::to_string_pretty(&profile)?
            } else {
                serde_json::to_string(&profile)?
            };
            println!("{rendered}");
            Ok(())
        }
    }
}
