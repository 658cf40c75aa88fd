mod common;

use std::time::{Duration, Instant};

use docroot::client::burst::burst;
use docroot::client::{exchange, fetch, request_bytes};
use docroot::config::{Config, Strategy};
use docroot::server::Server;

#[tokio::test]
async fn test_get_file_over_tcp() {
    let root = common::fixture_root("docroot-server-file");
    let (addr, _) = common::spawn_server(&root, Strategy::Concurrent, Duration::ZERO, false);

    let response = fetch("127.0.0.1", addr.port(), "/index.html").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(
        response.header("Content-Length"),
        Some(common::INDEX_HTML.len().to_string().as_str())
    );
    assert_eq!(response.body, common::INDEX_HTML);
}

#[tokio::test]
async fn test_status_table_over_tcp() {
    let root = common::fixture_root("docroot-server-table");
    let (addr, _) = common::spawn_server(&root, Strategy::Sequential, Duration::ZERO, false);
    let port = addr.port();

    let cases = [
        ("/docs/", 200, ""),
        ("/../../etc/passwd", 403, "Access denied"),
        ("/missing.html", 404, "File not found"),
        ("/notes.txt", 415, ""),
    ];
    for (path, status, body) in cases {
        let response = fetch("127.0.0.1", port, path).await.unwrap();
        assert_eq!(response.status, status, "{path}");
        if status != 200 {
            assert_eq!(response.body, body.as_bytes(), "{path}");
        }
    }

    let raw = exchange("127.0.0.1", port, b"POST /index.html HTTP/1.1\r\n\r\n")
        .await
        .unwrap();
    assert_eq!(raw, b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
}

#[tokio::test]
async fn test_malformed_request_closes_without_response() {
    let root = common::fixture_root("docroot-server-malformed");
    let (addr, _) = common::spawn_server(&root, Strategy::Sequential, Duration::ZERO, false);

    let raw = exchange("127.0.0.1", addr.port(), b"GARBAGE\r\n\r\n").await.unwrap();
    assert!(raw.is_empty());

    // The accept loop keeps going afterwards.
    let response = fetch("127.0.0.1", addr.port(), "/index.html").await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_silent_peer_does_not_stop_server() {
    let root = common::fixture_root("docroot-server-silent");
    let (addr, _) = common::spawn_server(&root, Strategy::Concurrent, Duration::ZERO, false);

    // Connect and hang up without sending anything.
    drop(tokio::net::TcpStream::connect(addr).await.unwrap());

    let response = fetch("127.0.0.1", addr.port(), "/").await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_strategy_overlaps_delays() {
    let root = common::fixture_root("docroot-server-concurrent");
    let delay = Duration::from_millis(400);
    let (addr, _) = common::spawn_server(&root, Strategy::Concurrent, delay, false);

    let report = burst("127.0.0.1", addr.port(), "/index.html", 8).await;

    assert_eq!(report.successful(), 8);
    assert_eq!(report.rate_limited(), 0);
    assert!(report.total >= delay);
    // Eight sequential delays would take 3.2s.
    assert!(
        report.total < delay * 4,
        "burst took {:?}, expected close to one delay",
        report.total
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sequential_strategy_serialises_delays() {
    let root = common::fixture_root("docroot-server-sequential");
    let delay = Duration::from_millis(150);
    let (addr, _) = common::spawn_server(&root, Strategy::Sequential, delay, false);

    let report = burst("127.0.0.1", addr.port(), "/index.html", 4).await;

    assert_eq!(report.successful(), 4);
    assert!(
        report.total >= delay * 4,
        "burst took {:?}, expected at least four delays",
        report.total
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_counts_survive_concurrent_load() {
    let root = common::fixture_root("docroot-server-counts");
    let (addr, counter) =
        common::spawn_server(&root, Strategy::Concurrent, Duration::from_millis(20), true);

    let report = burst("127.0.0.1", addr.port(), "/docs/a.html", 25).await;
    assert_eq!(report.successful(), 25);

    let listing = fetch("127.0.0.1", addr.port(), "/docs/").await.unwrap();
    let html = String::from_utf8(listing.body).unwrap();
    assert!(
        html.contains(r#"<a href="/docs/a.html">a.html</a> - 25 requests"#),
        "{html}"
    );
    assert!(html.contains(r#"<a href="/docs/b.pdf">b.pdf</a> - 0 requests"#));
    assert_eq!(counter.unwrap().count("/docs/a.html").await, 25);
}

#[tokio::test]
async fn test_server_bind_from_config() {
    let root = common::fixture_root("docroot-server-config");
    let mut cfg = Config::default();
    cfg.static_files.root = root;
    cfg.server.listen_addr = "127.0.0.1:0".to_string();
    cfg.server.strategy = Strategy::Concurrent;
    cfg.server.request_delay_ms = Some(0);

    let server = Server::bind(&cfg).unwrap();
    let port = server.local_addr().unwrap().port();
    tokio::spawn(server.run());

    let raw = exchange("127.0.0.1", port, &request_bytes("127.0.0.1", "/logo.png"))
        .await
        .unwrap();
    assert!(raw.starts_with(b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n"));
    assert!(raw.ends_with(common::LOGO_PNG));

    // The concurrent strategy counts by default.
    let listing = fetch("127.0.0.1", port, "/").await.unwrap();
    let html = String::from_utf8(listing.body).unwrap();
    assert!(
        html.contains(r#"<a href="/logo.png">logo.png</a> - 1 requests"#),
        "{html}"
    );
}

#[tokio::test]
async fn test_server_bind_rejects_bad_root() {
    let root = common::unique_temp_dir("docroot-server-badroot");
    let mut cfg = Config::default();
    cfg.static_files.root = root.join("absent");
    cfg.server.listen_addr = "127.0.0.1:0".to_string();

    assert!(Server::bind(&cfg).is_err());
}

#[tokio::test]
async fn test_timing_is_measured_from_burst_start() {
    let root = common::fixture_root("docroot-server-timing");
    let (addr, _) = common::spawn_server(&root, Strategy::Concurrent, Duration::ZERO, false);

    let started = Instant::now();
    let report = burst("127.0.0.1", addr.port(), "/missing.html", 3).await;

    assert_eq!(report.count_status(404), 3);
    assert_eq!(report.errors(), 0);
    assert!(report.total <= started.elapsed());
    assert!(report.throughput() > 0.0);
    assert_eq!(report.outcomes.iter().map(|o| o.id).collect::<Vec<_>>(), vec![0, 1, 2]);
}
