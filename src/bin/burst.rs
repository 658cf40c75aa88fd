use clap::Parser;
use docroot::client::burst::burst;

/// Fire simultaneous GETs at a docroot server and report timings.
#[derive(Debug, Parser)]
#[command(name = "docroot-burst", version)]
struct Args {
    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    #[arg(long, default_value = "/index.html")]
    path: String,

    /// Number of simultaneous requests
    #[arg(short = 'n', long, default_value_t = 10)]
    requests: usize,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();
    println!(
        "Testing {} concurrent requests to http://{}:{}{}",
        args.requests, args.host, args.port, args.path
    );

    let report = burst(&args.host, args.port, &args.path, args.requests).await;

    for outcome in &report.outcomes {
        match &outcome.status {
            Ok(status) => println!(
                "Request {}: {} - {:.3}s",
                outcome.id,
                status,
                outcome.elapsed.as_secs_f64()
            ),
            Err(e) => println!("Request {}: ERROR - {}", outcome.id, e),
        }
    }

    println!("Total time for {} requests: {:.3}s", args.requests, report.total.as_secs_f64());
    println!("Average time per request: {:.3}s", report.average().as_secs_f64());
    println!("Throughput: {:.2} requests/second", report.throughput());
    println!(
        "Successful (200): {}  Rate limited (429): {}  Errors: {}",
        report.successful(),
        report.rate_limited(),
        report.errors()
    );
}
