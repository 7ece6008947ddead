//! `[css]` section configuration.
//!
//! Browser targets drive vendor prefixing and syntax lowering of the
//! stylesheet tasks.
//!
//! # Example
//!
//! ```toml
//! [css.targets]
//! chrome = "80"
//! firefox = "78"
//! safari = "13.1"
//! ```
//!
//! Writing a `[css.targets]` table replaces the default set entirely:
//! browsers that are not listed are not targeted.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CssConfig {
    pub targets: CssTargets,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            targets: CssTargets::defaults(),
        }
    }
}

impl CssConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        self.targets.validate(diag);
    }
}

/// Minimum browser versions, written as `"major"` or `"major.minor"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssTargets {
    pub android: Option<String>,
    pub chrome: Option<String>,
    pub edge: Option<String>,
    pub firefox: Option<String>,
    pub ie: Option<String>,
    pub ios_saf: Option<String>,
    pub opera: Option<String>,
    pub safari: Option<String>,
    pub samsung: Option<String>,
}

impl CssTargets {
    /// Roughly the browsers autoprefixer covers with its default query.
    pub fn defaults() -> Self {
        let v = |s: &str| Some(s.to_string());
        Self {
            android: v("80"),
            chrome: v("80"),
            edge: v("88"),
            firefox: v("78"),
            ie: None,
            ios_saf: v("13"),
            opera: v("67"),
            safari: v("13"),
            samsung: v("12"),
        }
    }

    /// `(name, version)` pairs of every configured browser.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("android", self.android.as_deref()),
            ("chrome", self.chrome.as_deref()),
            ("edge", self.edge.as_deref()),
            ("firefox", self.firefox.as_deref()),
            ("ie", self.ie.as_deref()),
            ("ios_saf", self.ios_saf.as_deref()),
            ("opera", self.opera.as_deref()),
            ("safari", self.safari.as_deref()),
            ("samsung", self.samsung.as_deref()),
        ]
    }

    fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (name, version) in self.entries() {
            if let Some(version) = version
                && parse_version(version).is_none()
            {
                diag.error_with_hint(
                    FieldPath::owned(format!("css.targets.{name}")),
                    format!("invalid browser version `{version}`"),
                    "use \"major\" or \"major.minor\", e.g. \"13.1\"",
                );
            }
        }
    }
}

/// Encode `"major[.minor[.patch]]"` as `major << 16 | minor << 8 | patch`.
pub fn parse_version(version: &str) -> Option<u32> {
    let mut parts = version.trim().split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().map_or(Some(0), |s| s.parse().ok())?;
    let patch: u32 = parts.next().map_or(Some(0), |s| s.parse().ok())?;
    if parts.next().is_some() || major > 0xffff || minor > 0xff || patch > 0xff {
        return None;
    }
    Some((major << 16) | (minor << 8) | patch)
}
