//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Static asset pipeline with a live-reload dev server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file name, searched upward from the working directory
    #[arg(short = 'C', long, global = true, default_value = "assetflow.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Clean, build everything, watch sources and serve with live reload
    #[command(visible_alias = "d")]
    Dev {
        #[command(flatten)]
        serve_args: ServeArgs,
    },

    /// Clean, build with the combined stylesheet, serve and watch
    #[command(visible_alias = "p")]
    Prod {
        #[command(flatten)]
        serve_args: ServeArgs,
    },

    /// Run tasks or groups by name, one after another
    #[command(visible_alias = "r")]
    Run {
        /// Task or group names (see `list`)
        #[arg(required = true, value_name = "TASK")]
        tasks: Vec<String>,

        /// Enable verbose output for debugging
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// List registered tasks and groups
    #[command(visible_alias = "l")]
    List,
}

/// Arguments shared by the serving workflows
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Serve flags of `dev`/`prod`, if this invocation has them.
    pub const fn serve_args(&self) -> Option<&ServeArgs> {
        match &self.command {
            Commands::Dev { serve_args } | Commands::Prod { serve_args } => Some(serve_args),
            Commands::Run { .. } | Commands::List => None,
        }
    }

    pub const fn is_verbose(&self) -> bool {
        match &self.command {
            Commands::Dev { serve_args } | Commands::Prod { serve_args } => serve_args.verbose,
            Commands::Run { verbose, .. } => *verbose,
            Commands::List => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dev_flags() {
        let cli = Cli::parse_from(["assetflow", "dev", "-p", "4000", "-V"]);
        let args = cli.serve_args().unwrap();
        assert_eq!(args.port, Some(4000));
        assert!(cli.is_verbose());
        assert_eq!(cli.config, PathBuf::from("assetflow.toml"));
    }

    #[test]
    fn test_run_requires_task() {
        assert!(Cli::try_parse_from(["assetflow", "run"]).is_err());
        let cli = Cli::parse_from(["assetflow", "run", "delete", "build-dev"]);
        assert!(matches!(cli.command, Commands::Run { ref tasks, .. } if tasks.len() == 2));
        assert!(cli.serve_args().is_none());
    }

    #[test]
    fn test_top_level_version_flag_kept() {
        let err = Cli::try_parse_from(["assetflow", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
