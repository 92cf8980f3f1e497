//! Script minification with OXC.

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc_mangler::MangleOptions;
use oxc_minifier::{CompressOptions, CompressOptionsUnused, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::{AssetKind, TransformError};

/// How a script file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFlavor {
    /// Classic `<script>` source (`.js`, `.cjs`).
    Script,
    /// ES module source (`.mjs`).
    Module,
}

impl ScriptFlavor {
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("mjs") { ScriptFlavor::Module } else { ScriptFlavor::Script }
    }

    fn source_type(self) -> SourceType {
        match self {
            ScriptFlavor::Script => SourceType::default(),
            ScriptFlavor::Module => SourceType::mjs(),
        }
    }
}

/// Minify a script, mangling local names and compressing.
///
/// Top-level names and unreferenced declarations are kept: a classic script's
/// globals are used by other scripts and inline handlers the compressor cannot see.
pub fn minify_js(source: &str, flavor: ScriptFlavor) -> Result<String, TransformError> {
    let allocator = Allocator::default();

    let parse_result = Parser::new(&allocator, source, flavor.source_type()).parse();
    if let Some(error) = parse_result.errors.into_iter().next() {
        return Err(TransformError::failed(AssetKind::Script, error));
    }
    if parse_result.panicked {
        return Err(TransformError::failed(AssetKind::Script, "parser aborted"));
    }

    let mut program = parse_result.program;

    let compress = CompressOptions { unused: CompressOptionsUnused::Keep, ..CompressOptions::smallest() };
    let options = MinifierOptions { mangle: Some(MangleOptions::default()), compress: Some(compress) };
    let minified = Minifier::new(options).minify(&allocator, &mut program);

    let codegen_options =
        CodegenOptions { minify: true, comments: CommentOptions::disabled(), ..CodegenOptions::default() };

    let code = Codegen::new()
        .with_options(codegen_options)
        .with_scoping(minified.scoping)
        .build(&program)
        .code;

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js_function() {
        let src = "function f(){ return 1; }";
        assert_eq!(minify_js(src, ScriptFlavor::Script).unwrap(), "function f(){return 1}");
    }

    #[test]
    fn test_minify_js_keeps_unreferenced_globals() {
        assert_eq!(minify_js("var answer = 42;", ScriptFlavor::Script).unwrap(), "var answer=42;");
    }

    #[test]
    fn test_minify_js_mangles_parameters() {
        let out = minify_js("function g(a){ return a + 1; }", ScriptFlavor::Script).unwrap();
        assert_eq!(out, "function g(e){return e+1}");
    }

    #[test]
    fn test_minify_js_strips_comments() {
        let src = "// leading note\nvar answer = 42; /* trailing */\n";
        let out = minify_js(src, ScriptFlavor::Script).unwrap();
        assert!(!out.contains("leading note"));
        assert!(!out.contains("trailing"));
        assert!(out.contains("answer=42"));
    }

    #[test]
    fn test_minify_js_syntax_error() {
        let result = minify_js("function (", ScriptFlavor::Script);
        assert!(matches!(result, Err(TransformError::Failed { kind: AssetKind::Script, .. })));
        assert!(std::error::Error::source(&result.unwrap_err()).is_some());
    }

    #[test]
    fn test_minify_module_syntax() {
        let src = "export const greeting = 'hi';\n";
        let out = minify_js(src, ScriptFlavor::Module).unwrap();
        assert!(out.starts_with("export const greeting="));
    }

    #[test]
    fn test_flavor_from_extension() {
        assert_eq!(ScriptFlavor::from_extension("MJS"), ScriptFlavor::Module);
        assert_eq!(ScriptFlavor::from_extension("js"), ScriptFlavor::Script);
        assert_eq!(ScriptFlavor::from_extension("cjs"), ScriptFlavor::Script);
    }
}
