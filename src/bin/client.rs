use std::path::PathBuf;

use clap::Parser;
use docroot::client::{classify, fetch, save_body, BodyKind};

/// Fetch one path from a docroot server.
#[derive(Debug, Parser)]
#[command(name = "docroot-client", version)]
struct Args {
    /// Server host
    host: String,
    /// Server port
    port: u16,
    /// URL path to request, e.g. /index.html
    url_path: String,
    /// Where PNG and PDF bodies are saved
    directory: PathBuf,
}

/// Bytes of an unrecognised body shown to the operator.
const PREVIEW_LEN: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();
    println!("Requesting: http://{}:{}{}", args.host, args.port, args.url_path);

    let response = match fetch(&args.host, args.port, &args.url_path).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(1);
        }
    };

    let content_type = response.header("Content-Type").unwrap_or_default().to_string();
    println!("Status Code: {}", response.status);
    println!("Content-Type: {}", response.header("Content-Type").unwrap_or("unknown"));
    println!("Content-Length: {}", response.header("Content-Length").unwrap_or("unknown"));
    println!();

    if response.status != 200 {
        println!("Error: Server returned status code {}", response.status);
        println!("{}", String::from_utf8_lossy(&response.body));
        std::process::exit(1);
    }

    match classify(&content_type) {
        BodyKind::Html => {
            println!("{}", String::from_utf8_lossy(&response.body));
        }
        BodyKind::Download => {
            let saved = save_body(&args.directory, &args.url_path, &content_type, &response.body).await?;
            println!("File saved to: {}", saved.display());
            println!("File size: {} bytes", response.body.len());
        }
        BodyKind::Other => {
            let end = response.body.len().min(PREVIEW_LEN);
            println!("Unknown content type: {content_type}");
            println!("Body preview:");
            println!("{}", String::from_utf8_lossy(&response.body[..end]));
        }
    }

    Ok(())
}
