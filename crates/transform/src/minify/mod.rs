//! Minifiers for the text asset kinds.
//!
//! - Markup: whitespace and comment collapsing, raw-text elements untouched
//! - Stylesheets: lightningcss
//! - Scripts: OXC parse, mangle, compress, and codegen

pub mod css;
pub mod html;
pub mod js;

pub use css::minify_css;
pub use html::minify_html;
pub use js::{ScriptFlavor, minify_js};

use crate::{AssetKind, TransformError};

/// Minify `source` as `kind`. Pass-through kinds are returned unchanged.
pub fn minify(kind: AssetKind, source: &str, extension: &str) -> Result<String, TransformError> {
    match kind {
        AssetKind::Markup => minify_html(source),
        AssetKind::Stylesheet => minify_css(source),
        AssetKind::Script => minify_js(source, ScriptFlavor::from_extension(extension)),
        AssetKind::Passthrough => Ok(source.to_string()),
    }
}
