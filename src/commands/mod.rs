//! # Command System
//!
//! Slash command definitions and their registration with Discord.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Guild-scoped registration when `GUILD_ID` is set
//! - 1.0.0: Initial `/role` command

pub mod slash;

pub use crate::command_handler::CommandHandler;

pub use slash::{create_slash_commands, register_commands, register_global_commands, register_guild_commands, ROLE_COMMAND};
