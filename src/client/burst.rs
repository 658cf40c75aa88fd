//! Fires a burst of simultaneous GETs and times them.

use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::client::fetch;

#[derive(Debug, Clone)]
pub struct BurstOutcome {
    pub id: usize,
    /// Status code, or the error that prevented getting one.
    pub status: Result<u16, String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct BurstReport {
    pub outcomes: Vec<BurstOutcome>,
    pub total: Duration,
}

impl BurstReport {
    pub fn count_status(&self, status: u16) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status.as_ref().is_ok_and(|s| *s == status))
            .count()
    }

    pub fn successful(&self) -> usize {
        self.count_status(200)
    }

    /// Responses refused with 429. The server has no rate limiting, so this
    /// is expected to stay at zero.
    pub fn rate_limited(&self) -> usize {
        self.count_status(429)
    }

    pub fn errors(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_err()).count()
    }

    pub fn average(&self) -> Duration {
        if self.outcomes.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.outcomes.iter().map(|o| o.elapsed).sum();
        sum / self.outcomes.len() as u32
    }

    /// Requests per second over the whole burst.
    pub fn throughput(&self) -> f64 {
        let secs = self.total.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.outcomes.len() as f64 / secs
    }
}

/// Sends `count` GETs for `url_path` at once, each on its own connection.
/// Outcomes are ordered by request id.
pub async fn burst(host: &str, port: u16, url_path: &str, count: usize) -> BurstReport {
    let started = Instant::now();
    let mut set = JoinSet::new();

    for id in 0..count {
        let host = host.to_string();
        let url_path = url_path.to_string();
        set.spawn(async move {
            let begin = Instant::now();
            let status = fetch(&host, port, &url_path)
                .await
                .map(|resp| resp.status)
                .map_err(|e| format!("{e:#}"));
            BurstOutcome {
                id,
                status,
                elapsed: begin.elapsed(),
            }
        });
    }

    let mut outcomes = Vec::with_capacity(count);
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::error!(error = %e, "Burst task failed"),
        }
    }
    outcomes.sort_by_key(|o| o.id);

    BurstReport {
        outcomes,
        total: started.elapsed(),
    }
}
