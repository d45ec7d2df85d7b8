//! # Role Eligibility
//!
//! Decides which of a guild's roles members may toggle on themselves.
//! A role qualifies when it is not managed by an integration, is not
//! `@everyone`, and sits strictly below the bot's highest role (the
//! platform refuses to let the bot grant anything at or above it).

use serenity::model::guild::Role;
use serenity::model::id::{GuildId, RoleId};

/// The slice of a guild role the bot cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: String,
    pub position: i64,
    pub managed: bool,
}

impl From<&Role> for RoleSummary {
    fn from(role: &Role) -> Self {
        RoleSummary {
            id: role.id,
            name: role.name.clone(),
            position: role.position,
            managed: role.managed,
        }
    }
}

impl RoleSummary {
    pub fn is_everyone(&self, guild_id: GuildId) -> bool {
        self.position == 0 || self.id.0 == guild_id.0
    }
}

/// Highest position among the roles the bot holds.
pub fn bot_precedence(guild_roles: &[RoleSummary], bot_roles: &[RoleId]) -> Option<i64> {
    guild_roles
        .iter()
        .filter(|role| bot_roles.contains(&role.id))
        .map(|role| role.position)
        .max()
}

pub fn is_assignable(role: &RoleSummary, guild_id: GuildId, bot_precedence: i64) -> bool {
    !role.managed && !role.is_everyone(guild_id) && role.position < bot_precedence
}

/// Roles members may toggle, highest position first.
pub fn assignable_roles(
    guild_roles: &[RoleSummary],
    guild_id: GuildId,
    bot_roles: &[RoleId],
) -> Vec<RoleSummary> {
    let Some(precedence) = bot_precedence(guild_roles, bot_roles) else {
        return Vec::new();
    };

    let mut roles: Vec<RoleSummary> = guild_roles
        .iter()
        .filter(|role| is_assignable(role, guild_id, precedence))
        .cloned()
        .collect();
    roles.sort_by(|a, b| b.position.cmp(&a.position).then(a.id.0.cmp(&b.id.0)));
    roles
}

#[cfg(test)]
pub(crate) fn role(id: u64, name: &str, position: i64, managed: bool) -> RoleSummary {
    RoleSummary {
        id: RoleId(id),
        name: name.to_string(),
        position,
        managed,
    }
}
