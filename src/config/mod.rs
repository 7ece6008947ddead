//! Pipeline configuration management for `assetflow.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── serve      # [serve]
//! │   ├── html       # [html]
//! │   ├── css        # [css.targets]
//! │   ├── js         # [js]
//! │   ├── image      # [image]
//! │   └── tasks      # [tasks.<key>]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its default and
//! the working directory becomes the project root.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BuildConfig, CssConfig, CssTargets, HtmlConfig, ImageConfig, InputSpec, JsConfig,
    ServeConfig, TaskOverride, TasksConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assetflow.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Absolute path to the config file, empty when none was found (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub html: HtmlConfig,

    #[serde(default)]
    pub css: CssConfig,

    #[serde(default)]
    pub js: JsConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub tasks: TasksConfig,
}

impl PipelineConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; its parent directory is
    /// the project root. Serve flags override `[serve]`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                let path = crate::utils::path::normalize_path(&path);
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: crate::utils::path::normalize_path(&cwd),
                    ..Self::default()
                }
            }
        };

        if let Some(args) = cli.serve_args() {
            Self::update_option(&mut config.serve.interface, args.interface.as_ref());
            Self::update_option(&mut config.serve.port, args.port.as_ref());
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Absolute output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.build.output)
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, collecting all problems before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let diag = self.diagnose();
        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    fn diagnose(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        self.build.validate(&mut diag);
        self.serve.validate(&mut diag);
        self.css.validate(&mut diag);
        self.js.validate(&mut diag);
        self.image.validate(&mut diag);
        self.tasks
            .validate(crate::task::preset::KEYS, &self.build.output, &mut diag);
        diag
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<PipelineConfig, _> = toml::from_str("[build\noutput = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.build.output, PathBuf::from("build"));
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.js.target, "es2015");
        assert!(config.tasks.0.is_empty());
        assert!(config.diagnose().is_empty());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\noutput = \"dist\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_unknown_task_field_detected() {
        let content = "[tasks.html]\ninputs = \"*.htm\"";
        let (_, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
        assert_eq!(ignored, vec!["tasks.html.inputs".to_string()]);
    }

    #[test]
    fn test_validation_collects_across_sections() {
        let config = test_parse_config(
            "[serve]\nport = 35729\n[image]\njpeg_quality = 0\n[tasks.nope]\n",
        );
        let diag = config.diagnose();
        assert_eq!(diag.len(), 3);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Diagnostics(_))
        ));
    }

    #[test]
    fn test_output_dir() {
        let mut config = PipelineConfig::default();
        config.root = PathBuf::from("/project");
        assert_eq!(config.output_dir(), PathBuf::from("/project/build"));
    }
}
