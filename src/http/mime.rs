//! MIME type lookup by file extension.
//!
//! The table is deliberately closed: a file whose extension is not listed is
//! answered with 415 rather than guessed at.

use std::path::Path;

const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("png", "image/png"),
    ("pdf", "application/pdf"),
];

/// Returns the content type for `path`, matching the extension
/// case-insensitively.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Reverse lookup used by the client when a URL has no basename to save under.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    MIME_TYPES
        .iter()
        .find(|(known, _)| content_type.contains(known))
        .map(|(ext, _)| *ext)
}
