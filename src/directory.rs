//! The guild directory: where roles are listed, granted and revoked.
//!
//! `RoleDirectory` is the seam between the role menu and the platform API.
//! [`SerenityDirectory`] talks to Discord over REST; tests swap in an
//! in-memory directory.

use anyhow::Result;
use log::debug;
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::{GuildId, RoleId, UserId};
use std::sync::Arc;

use crate::roles::{self, RoleSummary};

/// Shown in the guild's audit log for every grant and revoke.
pub const AUDIT_LOG_REASON: &str = "Self-service role change via /role";

#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Every role defined in the guild.
    async fn guild_roles(&self, guild_id: GuildId) -> Result<Vec<RoleSummary>>;

    /// Roles held by the bot's own member in the guild.
    async fn bot_roles(&self, guild_id: GuildId) -> Result<Vec<RoleId>>;

    /// Grants a role. Granting a role the member already holds is a no-op.
    async fn add_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()>;

    /// Revokes a role. Revoking a role the member lacks is a no-op.
    async fn remove_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()>;

    /// Roles the bot can hand out in the guild, highest first.
    async fn assignable_roles(&self, guild_id: GuildId) -> Result<Vec<RoleSummary>> {
        let guild_roles = self.guild_roles(guild_id).await?;
        let bot_roles = self.bot_roles(guild_id).await?;
        Ok(roles::assignable_roles(&guild_roles, guild_id, &bot_roles))
    }
}

/// Directory backed by serenity's REST client.
#[derive(Clone)]
pub struct SerenityDirectory {
    http: Arc<Http>,
    bot_id: UserId,
}

impl SerenityDirectory {
    pub fn new(http: Arc<Http>, bot_id: UserId) -> Self {
        Self { http, bot_id }
    }

    /// Looks up the bot's own user id before building the directory.
    pub async fn connect(http: Arc<Http>) -> Result<Self> {
        let me = http.get_current_user().await?;
        debug!("Resolved bot user {} ({})", me.name, me.id);
        Ok(Self::new(http, me.id))
    }
}

#[async_trait]
impl RoleDirectory for SerenityDirectory {
    async fn guild_roles(&self, guild_id: GuildId) -> Result<Vec<RoleSummary>> {
        let roles = self.http.get_guild_roles(guild_id.0).await?;
        Ok(roles.iter().map(RoleSummary::from).collect())
    }

    async fn bot_roles(&self, guild_id: GuildId) -> Result<Vec<RoleId>> {
        let me = self.http.get_member(guild_id.0, self.bot_id.0).await?;
        Ok(me.roles)
    }

    async fn add_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()> {
        self.http
            .add_member_role(guild_id.0, user_id.0, role_id.0, Some(AUDIT_LOG_REASON))
            .await?;
        Ok(())
    }

    async fn remove_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()> {
        self.http
            .remove_member_role(guild_id.0, user_id.0, role_id.0, Some(AUDIT_LOG_REASON))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory directory for handler tests.

    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryDirectory {
        pub roles: Vec<RoleSummary>,
        pub bot_roles: Vec<RoleId>,
        pub members: Mutex<HashMap<UserId, HashSet<RoleId>>>,
        pub fail: bool,
    }

    impl MemoryDirectory {
        pub fn member_roles(&self, user_id: UserId) -> HashSet<RoleId> {
            self.members
                .lock()
                .unwrap()
                .get(&user_id)
                .cloned()
                .unwrap_or_default()
        }

        fn check(&self) -> Result<()> {
            if self.fail {
                anyhow::bail!("directory unavailable");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RoleDirectory for MemoryDirectory {
        async fn guild_roles(&self, _guild_id: GuildId) -> Result<Vec<RoleSummary>> {
            self.check()?;
            Ok(self.roles.clone())
        }

        async fn bot_roles(&self, _guild_id: GuildId) -> Result<Vec<RoleId>> {
            self.check()?;
            Ok(self.bot_roles.clone())
        }

        async fn add_role(&self, _guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()> {
            self.check()?;
            self.members
                .lock()
                .unwrap()
                .entry(user_id)
                .or_default()
                .insert(role_id);
            Ok(())
        }

        async fn remove_role(&self, _guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()> {
            self.check()?;
            if let Some(roles) = self.members.lock().unwrap().get_mut(&user_id) {
                roles.remove(&role_id);
            }
            Ok(())
        }
    }
}
