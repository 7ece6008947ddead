//! Top-level workflows.
//!
//! A workflow is a fixed plan of phases:
//!
//! ```text
//! dev:  Clean → Build(build-dev)  → Watch → Serve
//! prod: Clean → Build(build-prod) → Serve → Watch
//! ```
//!
//! `Watch` and `Serve` only start their subsystems; once every phase has
//! started, the calling thread answers HTTP requests until Ctrl+C.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossbeam::channel;

use crate::actor::Coordinator;
use crate::actor::fs::WatchSet;
use crate::cli::serve::{self, BoundServer};
use crate::config::PipelineConfig;
use crate::log;
use crate::task::preset::{self, BUILD_DEV, BUILD_PROD, DELETE};
use crate::task::{TaskContext, TaskRegistry};
use crate::transform::TransformSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Remove the output directory
    Clean,
    /// Run a build group; failures are reported, not fatal
    Build(&'static str),
    /// Start the watcher and live reload actors
    Watch,
    /// Bind the HTTP server
    Serve,
}

impl Workflow {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }

    pub const fn build_group(self) -> &'static str {
        match self {
            Self::Dev => BUILD_DEV,
            Self::Prod => BUILD_PROD,
        }
    }

    pub fn plan(self) -> Vec<Phase> {
        let build = Phase::Build(self.build_group());
        match self {
            Self::Dev => vec![Phase::Clean, build, Phase::Watch, Phase::Serve],
            Self::Prod => vec![Phase::Clean, build, Phase::Serve, Phase::Watch],
        }
    }
}

/// Run a workflow until shutdown.
pub fn run_workflow(config: &PipelineConfig, workflow: Workflow) -> Result<()> {
    let registry = Arc::new(preset::registry(config)?);
    let ctx = Arc::new(TaskContext {
        root: config.root.clone(),
        settings: TransformSettings::from_config(config),
    });
    log!("workflow"; "starting `{}`", workflow.name());

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    let mut shutdown_rx = Some(shutdown_rx);
    let mut server: Option<BoundServer> = None;
    let mut actors = None;

    for phase in workflow.plan() {
        match phase {
            Phase::Clean | Phase::Build(_) => run_batch_phase(&registry, &ctx, phase)?,
            Phase::Watch => {
                let set = WatchSet {
                    bindings: preset::watch_bindings(config, workflow)?,
                    root: config.root.clone(),
                    output_dir: config.output_dir(),
                };
                let mut coordinator =
                    Coordinator::new(set, Arc::clone(&registry), Arc::clone(&ctx))
                        .with_ws_port(config.serve.ws_port);
                if let Some(rx) = shutdown_rx.take() {
                    coordinator = coordinator.with_shutdown_signal(rx);
                }
                actors = Some(serve::spawn_actors(coordinator));
            }
            Phase::Serve => server = Some(serve::bind_server(config, shutdown_tx.clone())?),
        }
    }

    if let Some(server) = server {
        server.run()?;
    }
    serve::wait_for_shutdown(actors);
    Ok(())
}

/// Run `Clean` or `Build` to completion.
///
/// A failed clean aborts the workflow. A failed build only logs: the
/// watcher can repair the output once the source is fixed.
fn run_batch_phase(registry: &TaskRegistry, ctx: &TaskContext, phase: Phase) -> Result<()> {
    match phase {
        Phase::Clean => {
            registry
                .run(DELETE, ctx)
                .context("failed to clean the output directory")?;
        }
        Phase::Build(group) => {
            let start = Instant::now();
            match registry.run(group, ctx) {
                Ok(report) => log!(
                    "build";
                    "`{}` wrote {} files in {} ms",
                    group,
                    report.written.len(),
                    start.elapsed().as_millis()
                ),
                Err(e) => log!("error"; "`{}` failed: {}", group, e),
            }
        }
        Phase::Watch | Phase::Serve => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plans() {
        assert_eq!(
            Workflow::Dev.plan(),
            vec![Phase::Clean, Phase::Build("build-dev"), Phase::Watch, Phase::Serve]
        );
        assert_eq!(
            Workflow::Prod.plan(),
            vec![Phase::Clean, Phase::Build("build-prod"), Phase::Serve, Phase::Watch]
        );
    }

    fn setup(root: &std::path::Path) -> (TaskRegistry, TaskContext) {
        let mut config = test_parse_config("");
        config.root = root.to_path_buf();
        let registry = preset::registry(&config).unwrap();
        let ctx = TaskContext {
            root: root.to_path_buf(),
            settings: TransformSettings::from_config(&config),
        };
        (registry, ctx)
    }

    #[test]
    fn test_clean_then_failing_build_continues() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("build/stale")).unwrap();
        fs::write(root.join("build/stale/old.css"), "x").unwrap();
        fs::write(root.join("index.html"), "<p>  hello  </p>").unwrap();

        let (registry, ctx) = setup(root);
        run_batch_phase(&registry, &ctx, Phase::Clean).unwrap();
        assert!(!root.join("build").exists());

        // no stylesheets or scripts: several members fail
        run_batch_phase(&registry, &ctx, Phase::Build(BUILD_DEV)).unwrap();
        assert!(root.join("build/index.html").exists());
    }

    #[test]
    fn test_clean_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        // the output path is a file, not a directory
        fs::write(root.join("build"), "not a directory").unwrap();

        let (registry, ctx) = setup(root);
        assert!(run_batch_phase(&registry, &ctx, Phase::Clean).is_err());
    }
}
