use anyhow::Result;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::ROLE_COMMAND;
use crate::directory::RoleDirectory;
use crate::invoker::Invoker;
use crate::message_components::{create_role_menu, GUILD_ONLY};
use crate::reply::Reply;

pub struct CommandHandler<D> {
    directory: Arc<D>,
}

impl<D> Clone for CommandHandler<D> {
    fn clone(&self) -> Self {
        CommandHandler {
            directory: self.directory.clone(),
        }
    }
}

impl<D: RoleDirectory> CommandHandler<D> {
    pub fn new(directory: Arc<D>) -> Self {
        CommandHandler { directory }
    }

    pub async fn handle_slash_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        info!("Processing slash command: {} from user: {}", command.data.name, command.user.id);

        let invoker = Invoker::from_member(command.guild_id, command.member.as_ref());
        let reply = self.run(&command.data.name, invoker.as_ref()).await?;

        command
            .create_interaction_response(&ctx.http, |response| reply.write_response(response))
            .await?;
        Ok(())
    }

    /// Answer a slash command by name.
    pub async fn run(&self, name: &str, invoker: Option<&Invoker>) -> Result<Reply> {
        match name {
            ROLE_COMMAND => match invoker {
                Some(invoker) => self.role_menu(invoker).await,
                None => Ok(Reply::notice(GUILD_ONLY)),
            },
            _ => Ok(Reply::notice(format!(
                "Unknown command. Use `/{}` to manage your roles.",
                ROLE_COMMAND
            ))),
        }
    }

    /// List the roles the invoker may toggle as a menu of buttons.
    pub async fn role_menu(&self, invoker: &Invoker) -> Result<Reply> {
        let roles = self.directory.assignable_roles(invoker.guild_id).await?;
        info!(
            "Offering {} assignable roles to user {} in guild {}",
            roles.len(),
            invoker.user_id,
            invoker.guild_id
        );
        Ok(create_role_menu(invoker, &roles))
    }
}
