//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod config;
mod estimate;
mod generate;
mod utils;

pub use config::handle_config;
pub use estimate::handle_estimate;
pub use generate::{handle_create, handle_edit, handle_remix};
