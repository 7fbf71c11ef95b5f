//! Command-line interface definitions and helpers.
//!
//! This module contains CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction};
pub use commands::{chat_over, display_width, handle_config_action, run_chat, run_render};
pub use enums::CharacterSet;
