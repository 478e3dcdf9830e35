//! CLI argument parsing for podsvc.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// podsvc: create Podman Quadlet services on a Debian host.
///
/// Asks a few questions, writes `/etc/containers/systemd/<name>.container`,
/// provisions the service user and data directory, pulls the image and
/// starts the service. Run without a subcommand for the interactive flow.
#[derive(Parser, Debug)]
#[command(name = "podsvc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: /etc/podsvc/config.yaml if it exists).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run; `create` when none was given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Create(CreateArgs::default()))
    }
}

/// Available commands for podsvc.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create (or regenerate) a service.
    ///
    /// Collects the definition interactively unless `--from` is given, asks
    /// for confirmation, then provisions, pulls, writes the unit and starts it.
    Create(CreateArgs),

    /// Print the unit file a definition file would produce.
    ///
    /// Touches nothing on the host.
    Render(RenderArgs),

    /// Show an installed service's unit file and state.
    Show(ShowArgs),
}

/// Arguments for the `create` command.
#[derive(Parser, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Read the definition from a YAML file instead of prompting.
    #[arg(long, value_name = "PATH")]
    pub from: Option<PathBuf>,

    /// Print the unit file and stop before any change to the host.
    #[arg(long)]
    pub dry_run: bool,

    /// Do not ask for confirmation before making changes.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `render` command.
#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// YAML definition file.
    #[arg(long, value_name = "PATH")]
    pub from: PathBuf,
}

/// Arguments for the `show` command.
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Service name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_interactive_create() {
        let cli = Cli::try_parse_from(["podsvc"]).unwrap();
        match cli.command() {
            Command::Create(args) => {
                assert!(args.from.is_none());
                assert!(!args.dry_run);
                assert!(!args.yes);
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_create_flags() {
        let cli = Cli::try_parse_from([
            "podsvc", "create", "--from", "svc.yaml", "--dry-run", "-y",
        ])
        .unwrap();
        match cli.command() {
            Command::Create(args) => {
                assert_eq!(args.from, Some(PathBuf::from("svc.yaml")));
                assert!(args.dry_run);
                assert!(args.yes);
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["podsvc", "show", "nginxpm", "--config", "/tmp/c.yaml", "-vv"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yaml")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command(), Command::Show(ShowArgs { ref name }) if name == "nginxpm"));
    }

    #[test]
    fn test_render_requires_from() {
        assert!(Cli::try_parse_from(["podsvc", "render"]).is_err());
    }
}
