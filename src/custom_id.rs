//! # Button Identifiers
//!
//! Every button on the role menu carries a custom id of the form
//! `slash-role:<action>:<role-id>:<user-id>`. The user id is the member who
//! opened the menu; only they may press its buttons.
//!
//! Ids that do not follow this shape, or belong to another namespace, are
//! not ours and parse to `None`.

use serenity::model::id::{RoleId, UserId};
use std::fmt;

pub const NAMESPACE: &str = "slash-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    Add,
    Remove,
    Cancel,
}

impl RoleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleAction::Add => "add",
            RoleAction::Remove => "remove",
            RoleAction::Cancel => "cancel",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(RoleAction::Add),
            "remove" => Some(RoleAction::Remove),
            "cancel" => Some(RoleAction::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleButtonId {
    pub action: RoleAction,
    /// Always set for add/remove, always `None` for cancel.
    pub role_id: Option<RoleId>,
    /// `None` only for legacy cancel buttons, which anyone may press.
    pub user_id: Option<UserId>,
}

impl RoleButtonId {
    pub fn add(role_id: RoleId, user_id: UserId) -> Self {
        Self {
            action: RoleAction::Add,
            role_id: Some(role_id),
            user_id: Some(user_id),
        }
    }

    pub fn remove(role_id: RoleId, user_id: UserId) -> Self {
        Self {
            action: RoleAction::Remove,
            role_id: Some(role_id),
            user_id: Some(user_id),
        }
    }

    pub fn cancel(user_id: UserId) -> Self {
        Self {
            action: RoleAction::Cancel,
            role_id: None,
            user_id: Some(user_id),
        }
    }

    pub fn parse(custom_id: &str) -> Option<Self> {
        let parts: Vec<&str> = custom_id.split(':').collect();
        if parts.len() != 4 || parts[0] != NAMESPACE {
            return None;
        }

        let action = RoleAction::parse(parts[1])?;
        let role_id = parse_snowflake(parts[2]).map(RoleId);
        let user_id = parse_snowflake(parts[3]).map(UserId);

        match action {
            RoleAction::Add | RoleAction::Remove => {
                if role_id.is_none() || user_id.is_none() {
                    return None;
                }
            }
            RoleAction::Cancel => {
                if !parts[2].is_empty() || (!parts[3].is_empty() && user_id.is_none()) {
                    return None;
                }
            }
        }

        Some(Self {
            action,
            role_id,
            user_id,
        })
    }

    /// Whether `user_id` is allowed to press this button.
    pub fn pressable_by(&self, user_id: UserId) -> bool {
        self.user_id.map_or(true, |owner| owner == user_id)
    }
}

fn parse_snowflake(s: &str) -> Option<u64> {
    s.parse::<u64>().ok().filter(|id| *id != 0)
}

impl fmt::Display for RoleButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", NAMESPACE, self.action.as_str())?;
        if let Some(role_id) = self.role_id {
            write!(f, "{}", role_id.0)?;
        }
        f.write_str(":")?;
        if let Some(user_id) = self.user_id {
            write!(f, "{}", user_id.0)?;
        }
        Ok(())
    }
}
