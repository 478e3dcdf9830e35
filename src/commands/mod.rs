//! Command implementations for podsvc.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod create;
mod render;
mod show;

use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;
use std::path::Path;

/// Dispatch a command to its implementation.
///
/// The configuration is resolved first so that every command sees the same
/// paths and settings.
pub fn dispatch(command: Command, config_path: Option<&Path>) -> Result<()> {
    let config = Config::resolve(config_path)?;

    match command {
        Command::Create(args) => create::cmd_create(args, &config),
        Command::Render(args) => render::cmd_render(args, &config),
        Command::Show(args) => show::cmd_show(args, &config),
    }
}
