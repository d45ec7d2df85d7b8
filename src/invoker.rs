use serenity::model::guild::Member;
use serenity::model::id::{GuildId, RoleId, UserId};

/// The guild member behind an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub user_name: String,
    pub roles: Vec<RoleId>,
}

impl Invoker {
    /// `None` when the interaction did not come from a guild (e.g. a DM).
    pub fn from_member(guild_id: Option<GuildId>, member: Option<&Member>) -> Option<Self> {
        let guild_id = guild_id?;
        let member = member?;
        Some(Invoker {
            guild_id,
            user_id: member.user.id,
            user_name: member.user.name.clone(),
            roles: member.roles.clone(),
        })
    }

    pub fn holds(&self, role_id: RoleId) -> bool {
        self.roles.contains(&role_id)
    }
}
