//! Role slash command: /role

use serenity::builder::CreateApplicationCommand;

pub const ROLE_COMMAND: &str = "role";

/// Creates role commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_role_command()]
}

/// Creates the role command; its buttons take over from there
fn create_role_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name(ROLE_COMMAND)
        .description("Add or remove one of your roles")
        .dm_permission(false)
        .to_owned()
}
