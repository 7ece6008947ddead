//! Stylesheets: Sass compilation (grass), prefixing and minification
//! (lightningcss).

use std::path::Path;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::config::CssTargets;
use crate::config::section::css::parse_version;

/// Compile one SCSS entry file. `@use`/`@import` resolve relative to `source`.
pub fn compile_sass(scss: &str, source: &Path) -> Result<String, String> {
    let mut options = grass::Options::default();
    if let Some(parent) = source.parent() {
        options = options.load_path(parent);
    }
    grass::from_string(scss.to_owned(), &options).map_err(|e| e.to_string())
}

/// Add vendor prefixes for the configured browsers; output stays readable.
pub fn autoprefix(css: &str, targets: &CssTargets) -> Result<String, String> {
    process(css, targets, false)
}

/// Minify CSS, also prefixing for the configured browsers.
pub fn minify(css: &str, targets: &CssTargets) -> Result<String, String> {
    process(css, targets, true)
}

fn process(css: &str, targets: &CssTargets, minify: bool) -> Result<String, String> {
    let mut sheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| e.to_string())?;

    sheet
        .minify(MinifyOptions {
            targets: browser_targets(targets),
            ..MinifyOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let result = sheet
        .to_css(PrinterOptions {
            minify,
            targets: browser_targets(targets),
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;

    Ok(result.code)
}

fn browser_targets(targets: &CssTargets) -> Targets {
    let version = |v: &Option<String>| v.as_deref().and_then(parse_version);
    Targets::from(Browsers {
        android: version(&targets.android),
        chrome: version(&targets.chrome),
        edge: version(&targets.edge),
        firefox: version(&targets.firefox),
        ie: version(&targets.ie),
        ios_saf: version(&targets.ios_saf),
        opera: version(&targets.opera),
        safari: version(&targets.safari),
        samsung: version(&targets.samsung),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_compile_sass_variables_and_nesting() {
        let css = compile_sass("$c: #f00;\n.a { .b { color: $c; } }", Path::new("/x/index.scss"))
            .unwrap();
        assert!(css.contains(".a .b"));
        assert!(css.contains("red") || css.contains("#f00"));
    }

    #[test]
    fn test_compile_sass_resolves_partials() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_vars.scss"), "$w: 12px;").unwrap();
        let entry = dir.path().join("index.scss");
        let css = compile_sass("@import 'vars';\n.a { width: $w; }", &entry).unwrap();
        assert!(css.contains("12px"));
    }

    #[test]
    fn test_compile_sass_error() {
        assert!(compile_sass(".a { color: ", Path::new("index.scss")).is_err());
    }

    #[test]
    fn test_autoprefix_for_old_safari() {
        let targets = CssTargets {
            safari: Some("9".into()),
            ..CssTargets::default()
        };
        let out = autoprefix(".a { user-select: none; }", &targets).unwrap();
        assert!(out.contains("-webkit-user-select"));
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_minify_strips_whitespace() {
        let out = minify(".a {\n  color: red;\n}\n\n.b { margin: 0px; }", &CssTargets::defaults())
            .unwrap();
        assert!(!out.contains('\n'));
        assert!(out.starts_with(".a{"));
    }

    #[test]
    fn test_invalid_selector_is_error() {
        assert!(minify("..a { color: red; }", &CssTargets::defaults()).is_err());
    }
}
