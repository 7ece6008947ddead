//! Transform steps applied to a stream of file records.
//!
//! A task's chain is a list of [`Step`]s interpreted by [`apply_chain`]:
//! each step consumes the records produced by the previous one.
//!
//! | Step             | Backend        |
//! |------------------|----------------|
//! | `minify-html`    | minify-html    |
//! | `compile-sass`   | grass          |
//! | `autoprefix`     | lightningcss   |
//! | `minify-css`     | lightningcss   |
//! | `transpile`      | oxc            |
//! | `minify-js`      | oxc            |
//! | `compress-image` | image, usvg    |
//! | `concat`         | -              |
//! | `rename`         | -              |
//! | `size`           | -              |

mod html;
mod image;
mod script;
mod style;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{CssTargets, HtmlConfig, ImageConfig, JsConfig, PipelineConfig};
use crate::logger::human_size;

// ============================================================================
// Records
// ============================================================================

/// A file flowing through a transform chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path below the glob base; decides the output location.
    pub relative: PathBuf,
    /// Where the content was read from (diagnostics and import resolution).
    pub source: PathBuf,
    pub contents: Vec<u8>,
}

impl FileRecord {
    pub fn new(relative: impl Into<PathBuf>, source: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            relative: relative.into(),
            source: source.into(),
            contents,
        }
    }

    fn text(&self, step: Step) -> Result<&str, TransformError> {
        std::str::from_utf8(&self.contents)
            .map_err(|e| TransformError::new(step, &self.source, format!("not valid UTF-8: {e}")))
    }

    fn extension(&self) -> Option<String> {
        self.relative
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

// ============================================================================
// Steps
// ============================================================================

/// One transformation in a task chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    MinifyHtml,
    CompileSass,
    Autoprefix,
    MinifyCss,
    Transpile,
    MinifyJs,
    CompressImage,
    /// Join every record into one file named `name`.
    Concat { name: String },
    /// Replace the file name of every record.
    Rename { name: String },
    /// Pass-through that logs the total byte size.
    Size,
}

impl Step {
    pub fn concat(name: impl Into<String>) -> Self {
        Self::Concat { name: name.into() }
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self::Rename { name: name.into() }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::MinifyHtml => "minify-html",
            Self::CompileSass => "compile-sass",
            Self::Autoprefix => "autoprefix",
            Self::MinifyCss => "minify-css",
            Self::Transpile => "transpile",
            Self::MinifyJs => "minify-js",
            Self::CompressImage => "compress-image",
            Self::Concat { .. } => "concat",
            Self::Rename { .. } => "rename",
            Self::Size => "size",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concat { name } | Self::Rename { name } => write!(f, "{}({name})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A step failed on one file.
#[derive(Debug, Error)]
#[error("{step} failed on {}: {message}", file.display())]
pub struct TransformError {
    pub step: &'static str,
    pub file: PathBuf,
    pub message: String,
}

impl TransformError {
    fn new(step: Step, file: &Path, message: impl Into<String>) -> Self {
        Self {
            step: step.label(),
            file: file.to_path_buf(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Library options shared by every task of a run.
#[derive(Debug, Clone)]
pub struct TransformSettings {
    pub html: HtmlConfig,
    pub css_targets: CssTargets,
    pub js: JsConfig,
    pub image: ImageConfig,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl TransformSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            html: config.html.clone(),
            css_targets: config.css.targets.clone(),
            js: config.js.clone(),
            image: config.image.clone(),
        }
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Run `steps` in order; the first failing step aborts the chain.
pub fn apply_chain(
    task: &str,
    steps: &[Step],
    mut records: Vec<FileRecord>,
    settings: &TransformSettings,
) -> Result<Vec<FileRecord>, TransformError> {
    for step in steps {
        records = apply(task, step, records, settings)?;
    }
    Ok(records)
}

/// Apply a single step to the whole stream.
pub fn apply(
    task: &str,
    step: &Step,
    records: Vec<FileRecord>,
    settings: &TransformSettings,
) -> Result<Vec<FileRecord>, TransformError> {
    crate::debug!(task; "{} ({} files)", step, records.len());

    match step {
        Step::MinifyHtml => map_each(records, |mut rec| {
            rec.contents = html::minify(&rec.contents, &settings.html);
            Ok(rec)
        }),
        Step::CompileSass => records
            .into_iter()
            .filter(|rec| !is_partial(&rec.relative))
            .map(|mut rec| {
                let css = style::compile_sass(rec.text(Step::CompileSass)?, &rec.source)
                    .map_err(|e| TransformError::new(Step::CompileSass, &rec.source, e))?;
                rec.contents = css.into_bytes();
                rec.relative.set_extension("css");
                Ok(rec)
            })
            .collect(),
        Step::Autoprefix => map_each(records, |mut rec| {
            let css = style::autoprefix(rec.text(Step::Autoprefix)?, &settings.css_targets)
                .map_err(|e| TransformError::new(Step::Autoprefix, &rec.source, e))?;
            rec.contents = css.into_bytes();
            Ok(rec)
        }),
        Step::MinifyCss => map_each(records, |mut rec| {
            let css = style::minify(rec.text(Step::MinifyCss)?, &settings.css_targets)
                .map_err(|e| TransformError::new(Step::MinifyCss, &rec.source, e))?;
            rec.contents = css.into_bytes();
            Ok(rec)
        }),
        Step::Transpile => map_each(records, |mut rec| {
            let code = script::transpile(rec.text(Step::Transpile)?, &rec.source, &settings.js)
                .map_err(|e| TransformError::new(Step::Transpile, &rec.source, e))?;
            rec.contents = code.into_bytes();
            Ok(rec)
        }),
        Step::MinifyJs => map_each(records, |mut rec| {
            let code = script::minify(rec.text(Step::MinifyJs)?, &settings.js)
                .map_err(|e| TransformError::new(Step::MinifyJs, &rec.source, e))?;
            rec.contents = code.into_bytes();
            Ok(rec)
        }),
        Step::CompressImage => map_each(records, |mut rec| {
            let ext = rec.extension();
            rec.contents = image::compress(ext.as_deref(), &rec.contents, &settings.image)
                .map_err(|e| TransformError::new(Step::CompressImage, &rec.source, e))?;
            Ok(rec)
        }),
        Step::Concat { name } => Ok(concat(records, name)),
        Step::Rename { name } => Ok(rename(records, name)),
        Step::Size => {
            log_size(task, &records);
            Ok(records)
        }
    }
}

fn map_each<F>(records: Vec<FileRecord>, f: F) -> Result<Vec<FileRecord>, TransformError>
where
    F: FnMut(FileRecord) -> Result<FileRecord, TransformError>,
{
    records.into_iter().map(f).collect()
}

/// Sass partials are only imported, never emitted.
fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

/// Join with `\n`; an empty stream stays empty.
fn concat(records: Vec<FileRecord>, name: &str) -> Vec<FileRecord> {
    let Some(first) = records.first() else {
        return records;
    };
    let source = first.source.clone();

    let total: usize = records.iter().map(|r| r.contents.len() + 1).sum();
    let mut contents = Vec::with_capacity(total);
    for (i, rec) in records.iter().enumerate() {
        if i > 0 {
            contents.push(b'\n');
        }
        contents.extend_from_slice(&rec.contents);
    }

    vec![FileRecord::new(name, source, contents)]
}

fn rename(records: Vec<FileRecord>, name: &str) -> Vec<FileRecord> {
    records
        .into_iter()
        .map(|mut rec| {
            rec.relative.set_file_name(name);
            rec
        })
        .collect()
}

fn log_size(task: &str, records: &[FileRecord]) {
    let total: u64 = records.iter().map(|r| r.contents.len() as u64).sum();
    crate::log!("size"; "{} all files {}", task, human_size(total));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(relative: &str, contents: &str) -> FileRecord {
        FileRecord::new(relative, format!("/src/{relative}"), contents.as_bytes().to_vec())
    }

    #[test]
    fn test_concat_joins_in_order() {
        let out = concat(vec![rec("a.js", "var a;"), rec("lib/b.js", "var b;")], "main.js");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relative, PathBuf::from("main.js"));
        assert_eq!(out[0].contents, b"var a;\nvar b;");
        assert_eq!(out[0].source, PathBuf::from("/src/a.js"));
    }

    #[test]
    fn test_concat_empty_stream() {
        assert!(concat(Vec::new(), "main.js").is_empty());
    }

    #[test]
    fn test_rename_keeps_directory() {
        let out = rename(vec![rec("css/index.css", "")], "style.min.css");
        assert_eq!(out[0].relative, PathBuf::from("css/style.min.css"));
    }

    #[test]
    fn test_partials_dropped_by_compile_sass() {
        let settings = TransformSettings::default();
        let out = apply(
            "compile-scss",
            &Step::CompileSass,
            vec![rec("_vars.scss", "$c: red;"), rec("index.scss", "a { color: blue; }")],
            &settings,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].relative, PathBuf::from("index.css"));
    }

    #[test]
    fn test_chain_short_circuits_on_error() {
        let settings = TransformSettings::default();
        let steps = [Step::CompileSass, Step::concat("style.min.css")];
        let err = apply_chain(
            "compile-scss",
            &steps,
            vec![rec("index.scss", "a { color: ")],
            &settings,
        )
        .unwrap_err();
        assert_eq!(err.step, "compile-sass");
        assert_eq!(err.file, PathBuf::from("/src/index.scss"));
    }

    #[test]
    fn test_invalid_utf8_is_transform_error() {
        let settings = TransformSettings::default();
        let bad = FileRecord::new("a.js", "/src/a.js", vec![0xff, 0xfe]);
        let err = apply("compile-js", &Step::MinifyJs, vec![bad], &settings).unwrap_err();
        assert_eq!(err.step, "minify-js");
        assert!(err.message.contains("UTF-8"));
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::MinifyCss.to_string(), "minify-css");
        assert_eq!(Step::concat("main.js").to_string(), "concat(main.js)");
    }

    #[test]
    fn test_chain_is_deterministic() {
        let settings = TransformSettings::default();
        let steps = [
            Step::CompileSass,
            Step::Autoprefix,
            Step::concat("style.min.css"),
            Step::MinifyCss,
        ];
        let input = vec![rec("index.scss", "$w: 10px;\n.a { width: $w * 2; user-select: none; }")];
        let first = apply_chain("compile-scss", &steps, input.clone(), &settings).unwrap();
        let second = apply_chain("compile-scss", &steps, input, &settings).unwrap();
        assert_eq!(first, second);
    }
}
