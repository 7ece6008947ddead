//! `[html]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [html]
//! keep_comments = false   # Keep `<!-- -->` comments in minified output
//! minify_inline = true    # Minify inline `<style>` and `<script>` content
//! ```

use serde::{Deserialize, Serialize};

/// HTML minifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    pub keep_comments: bool,
    pub minify_inline: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            keep_comments: false,
            minify_inline: true,
        }
    }
}
