//! HTML directory listings.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::files::counter::RequestCounter;

struct Entry {
    name: String,
    is_dir: bool,
}

/// Renders the immediate children of `dir` as an HTML page.
///
/// `url_path` is the URL the directory was requested under; child links are
/// built from it. When a counter is given, every non-directory entry shows
/// how many times it has been served. Fails if the directory cannot be
/// enumerated.
pub async fn render_listing(
    dir: &Path,
    url_path: &str,
    counter: Option<&RequestCounter>,
) -> io::Result<Vec<u8>> {
    let url_path = if url_path.starts_with('/') {
        url_path.to_string()
    } else {
        format!("/{url_path}")
    };

    let mut entries = read_entries(dir).await?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut items = String::new();
    for entry in &entries {
        let href = child_href(&url_path, &entry.name);
        if entry.is_dir {
            items.push_str(&format!(
                "<li><a href=\"{}/\">{}/</a></li>",
                escape(&href),
                escape(&entry.name)
            ));
        } else {
            let count = match counter {
                Some(counter) => format!(" - {} requests", counter.count(&href).await),
                None => String::new(),
            };
            items.push_str(&format!(
                "<li><a href=\"{}\">{}</a>{}</li>",
                escape(&href),
                escape(&entry.name),
                count
            ));
        }
    }

    let title = escape(&url_path);
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Directory listing for {title}</title>
</head>
<body>
    <h1>Directory listing for {title}</h1>
    <hr>
    <ul>
        <li><a href="../">Parent Directory</a></li>
        {items}
    </ul>
    <hr>
</body>
</html>"#
    );

    Ok(html.into_bytes())
}

async fn read_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut read_dir = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        // Follows symlinks; a dangling link lists as a plain entry.
        let is_dir = fs::metadata(entry.path())
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }

    Ok(entries)
}

fn child_href(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
