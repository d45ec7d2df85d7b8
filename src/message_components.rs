use anyhow::Result;
use log::{info, warn};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::custom_id::{RoleAction, RoleButtonId};
use crate::directory::RoleDirectory;
use crate::invoker::Invoker;
use crate::rate_limiter::RateLimiter;
use crate::reply::{chunk_rows, ButtonKind, MenuButton, Reply, MAX_BUTTONS_PER_ROW, MAX_ROWS};
use crate::roles::RoleSummary;

/// One row is kept for the Cancel button.
pub const MAX_ROLE_BUTTONS: usize = (MAX_ROWS - 1) * MAX_BUTTONS_PER_ROW;

pub const MENU_PROMPT: &str = "🎭 Choose a role to add or remove:";
pub const GUILD_ONLY: &str = "This command can only be used in a server.";
pub const FAILURE_MESSAGE: &str = "❌ Sorry, I couldn't update your roles. Please try again.";

/// Handler for the role menu buttons
pub struct MessageComponentHandler<D> {
    directory: Arc<D>,
    rate_limiter: RateLimiter,
}

impl<D: RoleDirectory> MessageComponentHandler<D> {
    pub fn new(directory: Arc<D>, rate_limiter: RateLimiter) -> Self {
        Self {
            directory,
            rate_limiter,
        }
    }

    /// Handle a button click arriving over the gateway
    pub async fn handle_component_interaction(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let custom_id = &interaction.data.custom_id;
        info!("Processing component interaction: {} from user: {}", custom_id, interaction.user.id);

        let reply = match Invoker::from_member(interaction.guild_id, interaction.member.as_ref()) {
            Some(invoker) => match self.handle_button(&invoker, custom_id).await? {
                Some(reply) => reply,
                None => return Ok(()),
            },
            None => Reply::notice(GUILD_ONLY),
        };

        interaction
            .create_interaction_response(&ctx.http, |response| reply.write_response(response))
            .await?;

        Ok(())
    }

    /// Resolve a button click into a reply. `None` means the click is not ours.
    pub async fn handle_button(&self, invoker: &Invoker, custom_id: &str) -> Result<Option<Reply>> {
        let Some(button) = RoleButtonId::parse(custom_id) else {
            return Ok(None);
        };

        if !button.pressable_by(invoker.user_id) {
            info!("User {} pressed a role menu owned by someone else", invoker.user_id);
            return Ok(Some(Reply::notice(
                "🚫 Only the member who ran `/role` can use these buttons.",
            )));
        }

        let (grant, role_id) = match (button.action, button.role_id) {
            (RoleAction::Cancel, _) => return Ok(Some(Reply::update("❌ Cancelled."))),
            (RoleAction::Add, Some(role_id)) => (true, role_id),
            (RoleAction::Remove, Some(role_id)) => (false, role_id),
            (_, None) => return Ok(None),
        };

        // The button may be stale or forged; check the role against the guild as it is now.
        let assignable = self.directory.assignable_roles(invoker.guild_id).await?;
        let Some(role) = assignable.iter().find(|role| role.id == role_id) else {
            warn!("Role {} is not assignable in guild {}", role_id, invoker.guild_id);
            return Ok(Some(Reply::update("⚠️ That role can't be assigned anymore.")));
        };

        if let Err(wait) = self.rate_limiter.try_acquire(invoker.user_id) {
            warn!("Rate limit exceeded for user: {}", invoker.user_id);
            return Ok(Some(Reply::notice(format!(
                "⏱️ You're changing roles too quickly! Try again in {}s.",
                wait.as_secs().max(1)
            ))));
        }

        let content = if grant {
            self.directory.add_role(invoker.guild_id, invoker.user_id, role_id).await?;
            info!("Granted role {} to user {} in guild {}", role.name, invoker.user_id, invoker.guild_id);
            format!("✅ Granted role '{}' to {}.", role.name, invoker.user_name)
        } else {
            self.directory.remove_role(invoker.guild_id, invoker.user_id, role_id).await?;
            info!("Removed role {} from user {} in guild {}", role.name, invoker.user_id, invoker.guild_id);
            format!("✅ Removed role '{}' from {}.", role.name, invoker.user_name)
        };

        Ok(Some(Reply::update(content)))
    }
}

/// Create the role menu: one toggle button per role, then a Cancel row
pub fn create_role_menu(invoker: &Invoker, roles: &[RoleSummary]) -> Reply {
    if roles.is_empty() {
        return Reply::notice("There are no roles I can assign in this server.");
    }

    if roles.len() > MAX_ROLE_BUTTONS {
        warn!(
            "Guild {} has {} assignable roles, showing the first {}",
            invoker.guild_id,
            roles.len(),
            MAX_ROLE_BUTTONS
        );
    }

    let buttons = roles
        .iter()
        .take(MAX_ROLE_BUTTONS)
        .map(|role| create_role_button(invoker, role))
        .collect();

    let mut rows = chunk_rows(buttons);
    rows.push(vec![MenuButton {
        custom_id: RoleButtonId::cancel(invoker.user_id).to_string(),
        label: "Cancel".to_string(),
        kind: ButtonKind::Secondary,
    }]);

    Reply::message(MENU_PROMPT).with_rows(rows)
}

fn create_role_button(invoker: &Invoker, role: &RoleSummary) -> MenuButton {
    if invoker.holds(role.id) {
        MenuButton {
            custom_id: RoleButtonId::remove(role.id, invoker.user_id).to_string(),
            label: format!("Remove '{}'", role.name),
            kind: ButtonKind::Danger,
        }
    } else {
        MenuButton {
            custom_id: RoleButtonId::add(role.id, invoker.user_id).to_string(),
            label: format!("Add '{}'", role.name),
            kind: ButtonKind::Success,
        }
    }
}
