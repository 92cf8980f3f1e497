//! Stylesheet minification with lightningcss.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

use crate::{AssetKind, TransformError};

/// Minify a stylesheet.
///
/// Parsing runs without error recovery, so a malformed rule fails the whole
/// sheet instead of being dropped from the output.
pub fn minify_css(source: &str) -> Result<String, TransformError> {
    // Parse errors borrow `source`, so only their rendering can outlive this call.
    let mut sheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| TransformError::failed(AssetKind::Stylesheet, e.to_string()))?;

    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| TransformError::failed(AssetKind::Stylesheet, e))?;

    let printed = sheet
        .to_css(PrinterOptions { minify: true, ..PrinterOptions::default() })
        .map_err(|e| TransformError::failed(AssetKind::Stylesheet, e))?;

    Ok(printed.code)
}
