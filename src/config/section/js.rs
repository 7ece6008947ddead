//! `[js]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [js]
//! target = "es2015"       # Syntax level scripts are lowered to
//! mangle = true           # Shorten local identifiers
//! drop_console = false    # Remove `console.*` calls
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsConfig {
    pub target: String,
    pub mangle: bool,
    pub drop_console: bool,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            target: "es2015".to_string(),
            mangle: true,
            drop_console: false,
        }
    }
}

impl JsConfig {
    const TARGET: FieldPath = FieldPath::new("js.target");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !is_supported_target(&self.target) {
            diag.error_with_hint(
                Self::TARGET,
                format!("unsupported target `{}`", self.target),
                "use one of es2015 ... es2024, or esnext",
            );
        }
    }
}

/// ES5 is not accepted: the transformer cannot lower classes or arrows.
pub fn is_supported_target(target: &str) -> bool {
    let target = target.to_ascii_lowercase();
    if target == "esnext" {
        return true;
    }
    target
        .strip_prefix("es")
        .and_then(|year| year.parse::<u16>().ok())
        .is_some_and(|year| (2015..=2024).contains(&year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_supported_targets() {
        assert!(is_supported_target("es2015"));
        assert!(is_supported_target("ES2020"));
        assert!(is_supported_target("esnext"));
        assert!(!is_supported_target("es5"));
        assert!(!is_supported_target("es2030"));
        assert!(!is_supported_target("chrome80"));
    }

    #[test]
    fn test_js_config_validation() {
        let config = test_parse_config("[js]\ntarget = \"es3\"\ndrop_console = true");
        assert!(config.js.drop_console);
        assert!(config.js.mangle);
        let mut diag = ConfigDiagnostics::new();
        config.js.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
