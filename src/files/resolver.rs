//! Maps URL paths onto the served root.
//!
//! Containment is enforced after `.`/`..` collapsing, and again on the
//! symlink-resolved path when something exists there, so neither traversal
//! segments nor links pointing outside the root can reach foreign files.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;

/// What a URL path turned out to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
    Missing,
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub kind: TargetKind,
    /// Absolute filesystem path; canonical whenever the target exists.
    pub path: PathBuf,
}

impl ResolvedTarget {
    fn new(kind: TargetKind, path: PathBuf) -> Self {
        Self { kind, path }
    }
}

/// The directory being served, held in canonical absolute form.
#[derive(Debug, Clone)]
pub struct ServedRoot {
    path: PathBuf,
}

impl ServedRoot {
    /// Canonicalizes `path` and checks that it is a directory.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = std::fs::canonicalize(path.as_ref())?;
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classifies the target of `url_path`.
    ///
    /// The URL path is taken literally: no percent-decoding and no query
    /// stripping. A single leading `/` is removed before joining, so a path
    /// like `//etc/passwd` joins as absolute and ends up `Forbidden`.
    pub async fn resolve(&self, url_path: &str) -> ResolvedTarget {
        let relative = url_path.strip_prefix('/').unwrap_or(url_path);
        let joined = normalize(&self.path.join(relative));

        if !joined.starts_with(&self.path) {
            return ResolvedTarget::new(TargetKind::Forbidden, joined);
        }

        let real = match fs::canonicalize(&joined).await {
            Ok(real) => real,
            Err(_) => return ResolvedTarget::new(TargetKind::Missing, joined),
        };

        if !real.starts_with(&self.path) {
            return ResolvedTarget::new(TargetKind::Forbidden, real);
        }

        match fs::metadata(&real).await {
            Ok(meta) if meta.is_dir() => ResolvedTarget::new(TargetKind::Directory, real),
            Ok(meta) if meta.is_file() => ResolvedTarget::new(TargetKind::File, real),
            _ => ResolvedTarget::new(TargetKind::Missing, real),
        }
    }
}

/// Collapses `.` and `..` without touching the filesystem. `..` at the
/// filesystem root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonical form of a URL path used as a request-counter key: one leading
/// `/`, no empty or `.` segments, `..` folded into its parent, no trailing
/// `/` except for the root itself.
pub fn normalize_url_path(url_path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in url_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}
