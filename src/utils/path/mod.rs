//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `to_slash`, `strip_dot_prefix`)

pub mod fs;

pub use fs::{normalize_path, strip_dot_prefix, to_slash};
