//! JavaScript: syntax lowering and minification via oxc.
//!
//! Inputs are classic browser scripts (no `import`/`export`), so they are
//! parsed as scripts: top-level names are globals other scripts and inline
//! handlers call, and are never mangled or dropped. Lowering helpers are
//! read from the `babelHelpers` global instead of being imported.

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::diagnostics::OxcDiagnostic;
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{EngineTargets, HelperLoaderMode, TransformOptions, Transformer};

use crate::config::JsConfig;

/// Lower modern syntax to the configured ES target.
pub fn transpile(source: &str, path: &Path, js: &JsConfig) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::script()).parse();
    if !ret.errors.is_empty() {
        return Err(join_errors(&ret.errors));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let mut options = TransformOptions::from_target(&js.target)?;
    options.helper_loader.mode = HelperLoaderMode::External;
    let ret = Transformer::new(&allocator, path, &options).build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(join_errors(&ret.errors));
    }

    Ok(Codegen::new().build(&program).code)
}

/// Compress, mangle, and print without whitespace or comments.
pub fn minify(source: &str, js: &JsConfig) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::script()).parse();
    if !ret.errors.is_empty() {
        return Err(join_errors(&ret.errors));
    }
    let mut program = ret.program;

    // Script source keeps unused top-level bindings in the compressor.
    let mut compress = CompressOptions::smallest();
    compress.drop_console = js.drop_console;
    compress.target = EngineTargets::from_target(&js.target)?;

    let options = MinifierOptions {
        mangle: js.mangle.then(|| MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        }),
        compress: Some(compress),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);

    Ok(Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code)
}

fn join_errors(errors: &[OxcDiagnostic]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
