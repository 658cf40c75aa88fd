//! Client side of the wire: one GET per connection, read until close.
//!
//! Used by the `docroot-client` and `docroot-burst` binaries and by the
//! integration tests.

pub mod burst;

use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::mime::extension_for;
use crate::http::parser::{parse_response, ParsedResponse};

/// Default buffer size for reading responses
const BUFFER_SIZE: usize = 4096;

/// How a successful body should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Printed as text
    Html,
    /// Written to the download directory
    Download,
    /// Anything else; only a preview is shown
    Other,
}

pub fn classify(content_type: &str) -> BodyKind {
    if content_type.contains("text/html") {
        BodyKind::Html
    } else if content_type.contains("image/png") || content_type.contains("application/pdf") {
        BodyKind::Download
    } else {
        BodyKind::Other
    }
}

/// Raw request bytes for `GET url_path`.
pub fn request_bytes(host: &str, url_path: &str) -> Vec<u8> {
    format!("GET {url_path} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n").into_bytes()
}

/// Sends `raw` on a fresh connection and returns everything the server
/// writes back before closing.
pub async fn exchange(host: &str, port: u16, raw: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut stream = TcpStream::connect((host, port))
        .await
        .with_context(|| format!("connecting to {host}:{port}"))?;

    stream.write_all(raw).await?;
    stream.flush().await?;

    let mut response = BytesMut::with_capacity(BUFFER_SIZE);
    loop {
        let n = stream.read_buf(&mut response).await?;
        if n == 0 {
            break;
        }
    }

    Ok(response.to_vec())
}

/// Issues `GET url_path` and decodes the response. The path is sent as
/// given, apart from a leading `/` being added when missing.
pub async fn fetch(host: &str, port: u16, url_path: &str) -> anyhow::Result<ParsedResponse> {
    let url_path = with_leading_slash(url_path);
    let raw = exchange(host, port, &request_bytes(host, &url_path)).await?;
    Ok(parse_response(&raw)?)
}

/// File name to save a downloaded body under: the path's last segment taken
/// literally (query and fragment dropped), or `downloaded_file` plus an
/// extension guessed from the content type.
pub fn save_name(url_path: &str, content_type: &str) -> String {
    let path = url_path.split(['?', '#']).next().unwrap_or_default();
    let basename = path.rsplit('/').next().unwrap_or_default();

    if !basename.is_empty() {
        return basename.to_string();
    }

    match extension_for(content_type) {
        Some(ext) => format!("downloaded_file.{ext}"),
        None => "downloaded_file".to_string(),
    }
}

/// Writes `body` into `dir` (created if needed) and returns the file path.
pub async fn save_body(
    dir: &Path,
    url_path: &str,
    content_type: &str,
    body: &[u8],
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let target = dir.join(save_name(url_path, content_type));
    tokio::fs::write(&target, body)
        .await
        .with_context(|| format!("writing {}", target.display()))?;

    Ok(target)
}

fn with_leading_slash(url_path: &str) -> String {
    if url_path.starts_with('/') {
        url_path.to_string()
    } else {
        format!("/{url_path}")
    }
}
