#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use docroot::config::Strategy;
use docroot::files::{RequestCounter, ServedRoot};
use docroot::server::listener::bind;
use docroot::server::{Dispatcher, Server};

pub const INDEX_HTML: &[u8] = b"<html><body><h1>hello</h1></body></html>\n";
pub const LOGO_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
pub const PAPER_PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n";

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let seq = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("{}-{}-{}-{}", prefix, std::process::id(), ts, seq));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

/// A served tree:
///
/// ```text
/// index.html
/// logo.png
/// notes.txt
/// docs/a.html
/// docs/b.pdf
/// docs/sub/
/// ```
pub fn fixture_root(prefix: &str) -> PathBuf {
    let root = unique_temp_dir(prefix);
    write(&root, "index.html", INDEX_HTML);
    write(&root, "logo.png", LOGO_PNG);
    write(&root, "notes.txt", b"plain text\n");
    write(&root, "docs/a.html", b"<p>a</p>");
    write(&root, "docs/b.pdf", PAPER_PDF);
    std::fs::create_dir_all(root.join("docs/sub")).expect("failed to create docs/sub");
    root
}

pub fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    std::fs::write(&path, contents).expect("failed to write fixture file");
}

pub fn dispatcher(root: &Path) -> Dispatcher {
    Dispatcher::new(ServedRoot::new(root).expect("fixture root should exist"))
}

/// A dispatcher that counts serves, plus the counter it writes to.
pub fn counting_dispatcher(root: &Path) -> (Dispatcher, Arc<RequestCounter>) {
    let counter = Arc::new(RequestCounter::new());
    (dispatcher(root).with_counter(Arc::clone(&counter)), counter)
}

/// Starts a server on an ephemeral localhost port and returns its address
/// together with the request counter, when counting is enabled.
pub fn spawn_server(
    root: &Path,
    strategy: Strategy,
    delay: Duration,
    count_requests: bool,
) -> (SocketAddr, Option<Arc<RequestCounter>>) {
    let mut dispatcher = dispatcher(root).with_delay(delay);
    let counter = count_requests.then(|| Arc::new(RequestCounter::new()));
    if let Some(counter) = &counter {
        dispatcher = dispatcher.with_counter(Arc::clone(counter));
    }

    let listener = bind("127.0.0.1:0".parse().unwrap(), 128).expect("bind");
    let server = Server::from_parts(listener, Arc::new(dispatcher), strategy, 4096);
    let addr = server.local_addr().expect("local addr");

    tokio::spawn(server.run());

    (addr, counter)
}
