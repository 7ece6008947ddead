//! The built-in task set.
//!
//! | key          | task                           | output              |
//! |--------------|--------------------------------|---------------------|
//! | `html`       | `html-compile`                 | `<out>/`            |
//! | `video`      | `video-compile`                | `<out>/src/assets/video` |
//! | `font`       | `compile-font`                 | `<out>/src/assets/font`  |
//! | `image`      | `minify-image`                 | `<out>/src/assets/image` |
//! | `scss`       | `compile-scss`                 | `<out>/src/css/style.min.css`  |
//! | `module_css` | `compile-module-css`           | `<out>/src/css/module.min.css` |
//! | `all_css`    | `compile-all-css`              | `<out>/src/css/style.min.css`  |
//! | `javascript` | `compile-js`                   | `<out>/src/js/index.min.js`    |
//! | `boot_js`    | `compile-javascript-bootstrap` | `<out>/src/js/bootstrap.min.js`|
//!
//! `[tasks.<key>]` overrides input, output and final name per task.

use crate::actor::fs::WatchBinding;
use crate::config::{InputSpec, PipelineConfig};
use crate::pipeline::Workflow;
use crate::transform::Step;

use super::{GroupMode, TaskDef, TaskError, TaskRegistry};

/// Keys accepted under `[tasks.<key>]`.
pub const KEYS: &[&str] = &[
    "html",
    "video",
    "font",
    "image",
    "scss",
    "module_css",
    "all_css",
    "javascript",
    "boot_js",
];

pub const DELETE: &str = "delete";
pub const BUILD_DEV: &str = "build-dev";
pub const BUILD_PROD: &str = "build-prod";

struct Preset {
    key: &'static str,
    task: &'static str,
    input: &'static [&'static str],
    /// Below `[build] output`.
    dir: &'static str,
    new_name: Option<&'static str>,
    chain: fn(&str) -> Vec<Step>,
    /// Watch reactions push a reload to the browser.
    notify: bool,
}

static PRESETS: [Preset; 9] = [
    Preset {
        key: "html",
        task: "html-compile",
        input: &["./*.html"],
        dir: "",
        new_name: None,
        chain: html_chain,
        notify: true,
    },
    Preset {
        key: "video",
        task: "video-compile",
        input: &["./src/assets/video/*"],
        dir: "src/assets/video",
        new_name: None,
        chain: copy_chain,
        notify: false,
    },
    Preset {
        key: "font",
        task: "compile-font",
        input: &["./src/assets/font/**/*"],
        dir: "src/assets/font",
        new_name: None,
        chain: copy_chain,
        notify: false,
    },
    Preset {
        key: "image",
        task: "minify-image",
        input: &["./src/assets/image/*.{png,jpg,jpeg,gif,svg}"],
        dir: "src/assets/image",
        new_name: None,
        chain: image_chain,
        notify: false,
    },
    Preset {
        key: "scss",
        task: "compile-scss",
        input: &["./src/scss/index.scss"],
        dir: "src/css",
        new_name: Some("style.min.css"),
        chain: css_chain_sized,
        notify: true,
    },
    Preset {
        key: "module_css",
        task: "compile-module-css",
        input: &["./src/scss/module/module.scss"],
        dir: "src/css",
        new_name: Some("module.min.css"),
        chain: css_chain,
        notify: true,
    },
    Preset {
        key: "all_css",
        task: "compile-all-css",
        input: &["./src/scss/module/module.scss", "./src/scss/index.scss"],
        dir: "src/css",
        new_name: Some("style.min.css"),
        chain: css_chain_sized,
        notify: true,
    },
    Preset {
        key: "javascript",
        task: "compile-js",
        input: &["./src/js/**/*.js"],
        dir: "src/js",
        new_name: Some("index.min.js"),
        chain: script_chain,
        notify: true,
    },
    Preset {
        key: "boot_js",
        task: "compile-javascript-bootstrap",
        input: &[
            "./node_modules/bootstrap/dist/js/bootstrap.bundle.js",
            "./node_modules/bootstrap/js/dist/button.js",
        ],
        dir: "src/js",
        new_name: Some("bootstrap.min.js"),
        chain: bootstrap_chain,
        notify: true,
    },
];

fn copy_chain(_: &str) -> Vec<Step> {
    Vec::new()
}

fn html_chain(_: &str) -> Vec<Step> {
    vec![Step::MinifyHtml, Step::Size]
}

fn image_chain(_: &str) -> Vec<Step> {
    vec![Step::CompressImage, Step::Size]
}

fn css_chain(name: &str) -> Vec<Step> {
    vec![
        Step::CompileSass,
        Step::Autoprefix,
        Step::concat(name),
        Step::MinifyCss,
    ]
}

fn css_chain_sized(name: &str) -> Vec<Step> {
    vec![
        Step::CompileSass,
        Step::Autoprefix,
        Step::Size,
        Step::concat(name),
        Step::MinifyCss,
    ]
}

fn js_chain(bundle: &str) -> Vec<Step> {
    vec![Step::concat(bundle), Step::Transpile, Step::MinifyJs]
}

fn script_chain(_: &str) -> Vec<Step> {
    js_chain("main.js")
}

fn bootstrap_chain(_: &str) -> Vec<Step> {
    js_chain("bootstrap.js")
}

fn preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.key == key)
}

/// Build the task definition of `key` with config overrides applied.
pub fn task_def(config: &PipelineConfig, key: &str) -> Option<TaskDef> {
    let preset = preset(key)?;
    let over = config.tasks.get(key);

    let input = over
        .and_then(|o| o.input.clone())
        .map(InputSpec::into_vec)
        .unwrap_or_else(|| preset.input.iter().map(|s| (*s).to_string()).collect());
    let output = over
        .and_then(|o| o.output.clone())
        .unwrap_or_else(|| config.build.output.join(preset.dir));
    let rename = over
        .and_then(|o| o.new_name.clone())
        .or_else(|| preset.new_name.map(str::to_string));
    let steps = (preset.chain)(rename.as_deref().unwrap_or_default());

    Some(
        TaskDef::new(preset.task, input, output)
            .steps(steps)
            .rename(rename),
    )
}

fn task_name(key: &str) -> &'static str {
    preset(key).map_or("", |p| p.task)
}

fn build_members(workflow: Workflow) -> Vec<&'static str> {
    let css: &[&str] = match workflow {
        Workflow::Dev => &["module_css", "scss"],
        Workflow::Prod => &["all_css"],
    };
    ["html", "image"]
        .iter()
        .chain(css)
        .chain(&["boot_js", "javascript", "video", "font"])
        .map(|key| task_name(key))
        .collect()
}

/// The full registry: every preset task plus the workflow groups.
pub fn registry(config: &PipelineConfig) -> Result<TaskRegistry, TaskError> {
    let mut registry = TaskRegistry::new();

    registry.register_clean(DELETE, &config.build.output)?;
    for key in KEYS {
        if let Some(def) = task_def(config, key) {
            registry.register(def)?;
        }
    }

    registry.register_group(BUILD_DEV, GroupMode::Parallel, build_members(Workflow::Dev))?;
    registry.register_group(BUILD_PROD, GroupMode::Parallel, build_members(Workflow::Prod))?;
    registry.register_group("dev", GroupMode::Series, [DELETE, BUILD_DEV])?;
    registry.register_group("prod", GroupMode::Series, [DELETE, BUILD_PROD])?;

    registry.validate()?;
    Ok(registry)
}

/// Watch bindings of a workflow. In prod both stylesheet inputs rebuild
/// the combined stylesheet.
pub fn watch_bindings(
    config: &PipelineConfig,
    workflow: Workflow,
) -> Result<Vec<WatchBinding>, TaskError> {
    const WATCHED: [&str; 8] = [
        "html",
        "javascript",
        "boot_js",
        "scss",
        "module_css",
        "video",
        "font",
        "image",
    ];

    let mut bindings = Vec::with_capacity(WATCHED.len());
    for key in WATCHED {
        let (Some(preset), Some(def)) = (preset(key), task_def(config, key)) else {
            continue;
        };
        let reaction = match (workflow, key) {
            (Workflow::Prod, "scss" | "module_css") => task_name("all_css"),
            _ => preset.task,
        };
        bindings.push(WatchBinding::new(
            def.patterns()?,
            reaction,
            preset.notify,
        ));
    }
    Ok(bindings)
}
