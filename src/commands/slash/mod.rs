//! # Slash Commands (/)
//!
//! Discord native slash commands.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: `/role` hidden from DMs via `dm_permission(false)`
//! - 1.0.0: Initial release

mod role;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::http::Http;
use serenity::model::application::command::Command;
use serenity::model::id::GuildId;
use std::sync::Arc;

pub use role::ROLE_COMMAND;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    role::create_commands()
}

/// Registers to one guild when given (instant, for testing), otherwise globally
pub async fn register_commands(http: &Arc<Http>, guild_id: Option<GuildId>) -> Result<()> {
    match guild_id {
        Some(guild_id) => register_guild_commands(http, guild_id).await,
        None => register_global_commands(http).await,
    }
}

/// Registers all slash commands globally
pub async fn register_global_commands(http: &Arc<Http>) -> Result<()> {
    let slash_commands = create_slash_commands();

    Command::set_global_application_commands(http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully");
    Ok(())
}

/// Registers all slash commands for a specific guild (faster for testing)
pub async fn register_guild_commands(http: &Arc<Http>, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();

    guild_id
        .set_application_commands(http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered successfully for guild: {}", guild_id);
    Ok(())
}
