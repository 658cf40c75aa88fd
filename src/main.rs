use std::path::PathBuf;

use clap::Parser;
use docroot::config::{Config, Strategy};
use docroot::server::Server;

/// Serve a directory over HTTP/1.1.
#[derive(Debug, Parser)]
#[command(name = "docroot", version)]
struct Args {
    /// Directory to serve
    directory: PathBuf,

    /// YAML config file; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    listen: Option<String>,

    /// Port to listen on, keeping the configured host
    #[arg(short, long)]
    port: Option<u16>,

    /// Connection scheduling strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Artificial delay per request, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Listen backlog
    #[arg(long)]
    backlog: Option<u32>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::load(),
        };

        cfg.static_files.root = self.directory;
        if let Some(listen) = self.listen {
            cfg.server.listen_addr = listen;
        }
        if let Some(port) = self.port {
            let mut addr = cfg.listen_addr()?;
            addr.set_port(port);
            cfg.server.listen_addr = addr.to_string();
        }
        if let Some(strategy) = self.strategy {
            cfg.server.strategy = strategy;
        }
        if let Some(delay) = self.delay_ms {
            cfg.server.request_delay_ms = Some(delay);
        }
        if let Some(backlog) = self.backlog {
            cfg.server.backlog = backlog;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = match Args::parse().into_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Usage: docroot <DIRECTORY> [--port N] [--strategy sequential|concurrent]");
            std::process::exit(1);
        }
    };

    let server = Server::bind(&cfg)?;

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
