use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::files::resolver::normalize_url_path;

/// Per-URL count of successful file serves.
///
/// One instance is shared by every connection of a server; all access goes
/// through the single lock, held only for the increment or the lookup.
#[derive(Debug, Default)]
pub struct RequestCounter {
    counts: Mutex<HashMap<String, u64>>,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one serve of `url_path` and returns the new count.
    pub async fn record(&self, url_path: &str) -> u64 {
        let key = normalize_url_path(url_path);
        let mut counts = self.counts.lock().await;
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Current count for `url_path`; never-served paths read as 0.
    pub async fn count(&self, url_path: &str) -> u64 {
        let key = normalize_url_path(url_path);
        self.counts.lock().await.get(&key).copied().unwrap_or(0)
    }
}
