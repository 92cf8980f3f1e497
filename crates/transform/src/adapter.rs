//! The transform adapter used by the cache builder and watcher.
//!
//! ### Contract
//! - Text kinds (HTML, CSS, JS) are minified; HTML also receives the
//!   configured fragment before `</body>`.
//! - Every other extension passes through unchanged. That is not a failure.
//! - Content type comes from the static MIME table regardless of outcome.
//!
//! ### Stable Abstraction
//! - Uses the `Transformer` trait so callers do not depend on a specific
//!   minifier stack.

use bytes::Bytes;

use crate::kind::{AssetKind, content_type_for};
use crate::{TransformError, inject, minify};

/// Result of a successful transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub content: Bytes,
    pub content_type: &'static str,
    /// `false` when the input was passed through unchanged.
    pub transformed: bool,
}

/// Stable transformer trait for asset processing.
pub trait Transformer: Send + Sync {
    /// Transform `input`, a file with extension `extension` (no dot, any case).
    fn transform(&self, input: Bytes, extension: &str) -> Result<TransformOutput, TransformError>;
}

/// Minifying transformer with optional HTML injection.
#[derive(Debug, Clone)]
pub struct AssetTransformer {
    minify: bool,
    fragment: Option<Bytes>,
}

impl AssetTransformer {
    /// Create a transformer that minifies and injects nothing.
    pub fn new() -> Self {
        Self { minify: true, fragment: None }
    }

    /// Inject `fragment` into every HTML document.
    pub fn with_fragment(mut self, fragment: impl Into<Bytes>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Enable or disable minification. Injection still applies when disabled.
    pub fn with_minify(mut self, enable: bool) -> Self {
        self.minify = enable;
        self
    }

    fn transform_text(&self, kind: AssetKind, input: &[u8], extension: &str) -> Result<Bytes, TransformError> {
        let source = std::str::from_utf8(input).map_err(|source| TransformError::InvalidUtf8 { kind, source })?;

        let mut output = if self.minify {
            minify::minify(kind, source, extension)?.into_bytes()
        } else {
            input.to_vec()
        };

        if kind == AssetKind::Markup
            && let Some(fragment) = &self.fragment
        {
            output = inject::inject_fragment(&output, fragment);
        }

        Ok(Bytes::from(output))
    }
}

impl Default for AssetTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for AssetTransformer {
    fn transform(&self, input: Bytes, extension: &str) -> Result<TransformOutput, TransformError> {
        let kind = AssetKind::from_extension(extension);
        let content_type = content_type_for(extension);

        if !kind.is_text() {
            return Ok(TransformOutput { content: input, content_type, transformed: false });
        }

        let content = self.transform_text(kind, &input, extension)?;
        Ok(TransformOutput { content, content_type, transformed: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &[u8] = b"<script>guard()</script>";

    #[test]
    fn test_html_minified_and_injected() {
        let transformer = AssetTransformer::new().with_fragment(FRAGMENT);
        let out = transformer
            .transform(Bytes::from_static(b"<html>\n  <body>Hi</body>\n</html>"), "html")
            .unwrap();
        assert_eq!(&out.content[..], b"<html> <body>Hi<script>guard()</script></body> </html>");
        assert_eq!(out.content_type, "text/html");
        assert!(out.transformed);
    }

    #[test]
    fn test_html_injection_without_body() {
        let transformer = AssetTransformer::new().with_fragment(FRAGMENT);
        let out = transformer.transform(Bytes::from_static(b"<p>x</p>"), "htm").unwrap();
        assert_eq!(&out.content[..], b"<p>x</p><script>guard()</script>");
    }

    #[test]
    fn test_js_minified() {
        let src = Bytes::from_static(b"function f(){ return 1; }");
        let out = AssetTransformer::new().transform(src, "JS").unwrap();
        assert_eq!(&out.content[..], b"function f(){return 1}");
        assert_eq!(out.content_type, "application/javascript");
        assert!(out.transformed);
    }

    #[test]
    fn test_binary_passthrough() {
        let png = Bytes::from_static(&[0x89, b'P', b'N', b'G', 0x00, 0xff]);
        let out = AssetTransformer::new().transform(png.clone(), "png").unwrap();
        assert_eq!(out.content, png);
        assert_eq!(out.content_type, "image/png");
        assert!(!out.transformed);
    }

    #[test]
    fn test_unknown_extension_passthrough() {
        let out = AssetTransformer::new().transform(Bytes::from_static(b"data"), "bin").unwrap();
        assert_eq!(out.content_type, "application/octet-stream");
        assert!(!out.transformed);
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let result = AssetTransformer::new().transform(Bytes::from_static(&[0xff, 0xfe, b'a']), "css");
        assert!(matches!(result, Err(TransformError::InvalidUtf8 { kind: AssetKind::Stylesheet, .. })));
    }

    #[test]
    fn test_minifier_error_reported() {
        let result = AssetTransformer::new().transform(Bytes::from_static(b"function ("), "js");
        assert!(matches!(result, Err(TransformError::Failed { kind: AssetKind::Script, .. })));
    }

    #[test]
    fn test_minify_disabled_still_injects() {
        let transformer = AssetTransformer::new().with_minify(false).with_fragment(FRAGMENT);
        let out = transformer.transform(Bytes::from_static(b"<body>\n  Hi\n</body>"), "html").unwrap();
        assert_eq!(&out.content[..], b"<body>\n  Hi\n<script>guard()</script></body>");
    }

    #[test]
    fn test_minify_disabled_leaves_css() {
        let css = Bytes::from_static(b"a {  color: red  }");
        let out = AssetTransformer::new().with_minify(false).transform(css.clone(), "css").unwrap();
        assert_eq!(out.content, css);
        assert!(out.transformed);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let transformer = AssetTransformer::new().with_fragment(FRAGMENT);
        let input = Bytes::from_static(b"<html><body><p>  a  </p></body></html>");
        let first = transformer.transform(input.clone(), "html").unwrap();
        let second = transformer.transform(input, "html").unwrap();
        assert_eq!(first, second);
    }
}
