//! Embedded static resources.
//!
//! - `template` - Placeholder substitution
//! - `serve` - Dev server resources (hotreload.js)
//!
//! ```ignore
//! use embed::serve::{HOTRELOAD_JS, HotreloadVars};
//!
//! let js = HOTRELOAD_JS.render(&HotreloadVars { ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// URL the dev server answers with the live reload client.
    pub const HOTRELOAD_URL: &str = "/__assetflow/hotreload.js";

    /// Kept verbatim by the build-time minifier.
    const WS_PORT_PLACEHOLDER: &str = "__ASSETFLOW_WS_PORT__";

    /// Variables for hotreload.js.
    pub struct HotreloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for HotreloadVars {
        fn values(&self) -> Vec<(&'static str, String)> {
            vec![(WS_PORT_PLACEHOLDER, self.ws_port.to_string())]
        }
    }

    /// Live reload client, minified by build.rs.
    pub const HOTRELOAD_JS: Template<HotreloadVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/hotreload.min.js")));

    /// Script tag injected into served HTML pages.
    pub fn hotreload_tag() -> String {
        format!(r#"<script src="{HOTRELOAD_URL}"></script>"#)
    }
}

#[cfg(test)]
mod tests {
    use super::serve::*;

    #[test]
    fn test_hotreload_port_injected() {
        let js = HOTRELOAD_JS.render(&HotreloadVars { ws_port: 35731 });
        assert!(js.contains("35731"));
        assert!(!js.contains("__ASSETFLOW_WS_PORT__"));
        assert!(js.contains("WebSocket"));
    }

    #[test]
    fn test_hotreload_tag() {
        assert_eq!(
            hotreload_tag(),
            r#"<script src="/__assetflow/hotreload.js"></script>"#
        );
    }
}
