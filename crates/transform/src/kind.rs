//! Asset kinds and the static extension → MIME table.

use std::fmt;

/// Content type for extensions missing from the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// What the transform pipeline does with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Markup,
    Stylesheet,
    Script,
    /// Served byte-for-byte.
    Passthrough,
}

impl AssetKind {
    /// Classify a file extension (without the dot, any case).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => AssetKind::Markup,
            "css" => AssetKind::Stylesheet,
            "js" | "mjs" | "cjs" => AssetKind::Script,
            _ => AssetKind::Passthrough,
        }
    }

    pub fn is_text(self) -> bool {
        !matches!(self, AssetKind::Passthrough)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Markup => "html",
            AssetKind::Stylesheet => "css",
            AssetKind::Script => "js",
            AssetKind::Passthrough => "passthrough",
        };
        f.write_str(name)
    }
}

/// Resolve the content type for a file extension (without the dot, any case).
pub fn content_type_for(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "js" | "mjs" | "cjs" => "application/javascript",
        "css" => "text/css",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "json" | "map" => "application/json",
        "txt" => "text/plain",
        "xml" => "application/xml",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        _ => OCTET_STREAM,
    }
}
