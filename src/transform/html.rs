//! HTML minification via minify-html.

use crate::config::HtmlConfig;

/// Minify an HTML document.
///
/// Never fails: minify-html is tolerant of malformed markup. When the
/// minified output is not smaller the input is kept as-is.
pub fn minify(source: &[u8], config: &HtmlConfig) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = config.keep_comments;
    cfg.minify_css = config.minify_inline;
    cfg.minify_js = config.minify_inline;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;

    let minified = minify_html::minify(source, &cfg);
    if minified.len() < source.len() {
        minified
    } else {
        source.to_vec()
    }
}
