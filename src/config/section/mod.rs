//! Configuration section definitions.
//!
//! Each module corresponds to a section in `assetflow.toml`:
//!
//! | Module  | TOML Section     | Purpose                               |
//! |---------|------------------|---------------------------------------|
//! | `build` | `[build]`        | Output directory                      |
//! | `serve` | `[serve]`        | Development server and reload socket  |
//! | `html`  | `[html]`         | HTML minifier options                 |
//! | `css`   | `[css.targets]`  | Browser targets for prefixing/minify  |
//! | `js`    | `[js]`           | Transpile target and minifier options |
//! | `image` | `[image]`        | Image compression options             |
//! | `tasks` | `[tasks.<key>]`  | Per-task input/output/new_name        |

mod build;
pub mod css;
mod html;
mod image;
mod js;
mod serve;
mod tasks;

pub use build::BuildConfig;
pub use css::{CssConfig, CssTargets};
pub use html::HtmlConfig;
pub use image::ImageConfig;
pub use js::JsConfig;
pub use serve::ServeConfig;
pub use tasks::{InputSpec, TaskOverride, TasksConfig};
