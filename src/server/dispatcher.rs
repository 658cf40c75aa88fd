//! Turns a parsed request into a response.
//!
//! The outcome is decided in this order, first match wins:
//!
//! | Condition                          | Status |
//! |------------------------------------|--------|
//! | method is not GET                  | 405    |
//! | path escapes the root              | 403    |
//! | directory, listing rendered        | 200    |
//! | directory, listing failed          | 404    |
//! | nothing at the path                | 404    |
//! | file with an unknown extension     | 415    |
//! | file with a known extension        | 200    |
//! | any other fault                    | 500    |

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::fs;

use crate::config::Config;
use crate::files::{render_listing, RequestCounter, ServedRoot, TargetKind};
use crate::http::mime::content_type_for;
use crate::http::request::Request;
use crate::http::response::Response;

#[derive(Debug)]
pub struct Dispatcher {
    root: ServedRoot,
    counter: Option<Arc<RequestCounter>>,
    delay: Duration,
}

impl Dispatcher {
    pub fn new(root: ServedRoot) -> Self {
        Self {
            root,
            counter: None,
            delay: Duration::ZERO,
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let root = ServedRoot::new(&cfg.static_files.root).with_context(|| {
            format!("cannot serve {}", cfg.static_files.root.display())
        })?;

        let mut dispatcher = Self::new(root).with_delay(cfg.request_delay());
        if cfg.count_requests() {
            dispatcher = dispatcher.with_counter(Arc::new(RequestCounter::new()));
        }
        Ok(dispatcher)
    }

    /// Counts successful file serves and shows the counts in listings.
    pub fn with_counter(mut self, counter: Arc<RequestCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Sleeps this long on every GET before touching the filesystem.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn root(&self) -> &ServedRoot {
        &self.root
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Always produces a response; internal faults become a bodiless 500.
    pub async fn dispatch(&self, req: &Request) -> Response {
        match self.try_dispatch(req).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    method = %req.method,
                    path = %req.path,
                    error = ?e,
                    "Request failed"
                );
                Response::internal_error()
            }
        }
    }

    async fn try_dispatch(&self, req: &Request) -> anyhow::Result<Response> {
        if !req.is_get() {
            tracing::debug!(method = %req.method, "Rejecting non-GET request");
            return Ok(Response::method_not_allowed());
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let url_path = if req.path.is_empty() { "/" } else { req.path.as_str() };
        let target = self.root.resolve(url_path).await;

        match target.kind {
            TargetKind::Forbidden => {
                tracing::warn!(
                    path = %url_path,
                    resolved = %target.path.display(),
                    "Path escapes served root"
                );
                Ok(Response::forbidden())
            }
            TargetKind::Directory => {
                match render_listing(&target.path, url_path, self.counter.as_deref()).await {
                    Ok(html) => Ok(Response::ok("text/html", html)),
                    Err(e) => {
                        tracing::warn!(path = %url_path, error = %e, "Directory listing failed");
                        Ok(Response::directory_not_found())
                    }
                }
            }
            TargetKind::Missing => {
                tracing::debug!(path = %url_path, "Not found");
                Ok(Response::not_found())
            }
            TargetKind::File => self.serve_file(url_path, &target.path).await,
        }
    }

    async fn serve_file(&self, url_path: &str, path: &Path) -> anyhow::Result<Response> {
        let Some(content_type) = content_type_for(path) else {
            tracing::debug!(path = %url_path, "Unsupported file type");
            return Ok(Response::unsupported_media_type());
        };

        let body = fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;

        if let Some(counter) = &self.counter {
            let count = counter.record(url_path).await;
            tracing::debug!(path = %url_path, count, "Recorded serve");
        }

        Ok(Response::ok(content_type, body))
    }
}
