//! Config field path used in diagnostics.

use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::fmt;

/// Dotted path of a config field (e.g. `serve.port`, `tasks.scss.new_name`).
///
/// Static sections use [`FieldPath::new`]; task keys are only known at
/// runtime and go through [`FieldPath::owned`].
///
/// # Example
///
/// ```ignore
/// diag.error(ServeConfig::PORT, "must not be 0");
/// diag.error(FieldPath::owned(format!("tasks.{key}.input")), "empty input list");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Cow<'static, str>);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    #[inline]
    pub fn owned(path: String) -> Self {
        Self(Cow::Owned(path))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
