use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord_token: String,
    pub application_id: u64,
    pub guild_id: Option<u64>,
    pub log_level: String,
    pub discord_public_key: Option<String>,
    pub http_port: u16,
    pub role_toggle_limit: usize,
    pub role_toggle_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token = env::var("DISCORD_TOKEN")
            .or_else(|_| env::var("TOKEN"))
            .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN environment variable not set"))?;

        let application_id = env::var("APPLICATION_ID")
            .map_err(|_| anyhow::anyhow!("APPLICATION_ID environment variable not set"))?;

        Ok(Config {
            discord_token,
            application_id: parse_var("APPLICATION_ID", &application_id)?,
            guild_id: optional_var("GUILD_ID")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            discord_public_key: env::var("DISCORD_PUBLIC_KEY").ok(),
            http_port: optional_var("HTTP_PORT")?.unwrap_or(6666),
            role_toggle_limit: optional_var("ROLE_TOGGLE_LIMIT")?.unwrap_or(5),
            role_toggle_window_secs: optional_var("ROLE_TOGGLE_WINDOW_SECS")?.unwrap_or(30),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} has an invalid value: {:?}", name, value))
}

/// Unset or empty variables yield `None`; anything else must parse.
fn optional_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => parse_var(name, &value).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests below mutate process-wide environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear() {
        for name in [
            "DISCORD_TOKEN",
            "TOKEN",
            "APPLICATION_ID",
            "GUILD_ID",
            "LOG_LEVEL",
            "DISCORD_PUBLIC_KEY",
            "HTTP_PORT",
            "ROLE_TOGGLE_LIMIT",
            "ROLE_TOGGLE_WINDOW_SECS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_config_from_env_missing_required() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();

        let result = Config::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        env::set_var("DISCORD_TOKEN", "test_discord_token");
        env::set_var("APPLICATION_ID", "1234");

        let config = Config::from_env().unwrap();
        assert_eq!(config.discord_token, "test_discord_token");
        assert_eq!(config.application_id, 1234);
        assert_eq!(config.guild_id, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.http_port, 6666);
        assert_eq!(config.role_toggle_limit, 5);
        assert_eq!(config.role_toggle_window_secs, 30);
        assert!(config.discord_public_key.is_none());

        clear();
    }

    #[test]
    fn test_config_legacy_token_and_guild() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        env::set_var("TOKEN", "legacy_token");
        env::set_var("APPLICATION_ID", "1234");
        env::set_var("GUILD_ID", "987654321");

        let config = Config::from_env().unwrap();
        assert_eq!(config.discord_token, "legacy_token");
        assert_eq!(config.guild_id, Some(987654321));

        clear();
    }

    #[test]
    fn test_config_rejects_malformed_numbers() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        env::set_var("DISCORD_TOKEN", "test_discord_token");
        env::set_var("APPLICATION_ID", "1234");
        env::set_var("GUILD_ID", "not-a-guild");

        assert!(Config::from_env().is_err());

        env::set_var("GUILD_ID", "");
        env::set_var("HTTP_PORT", "99999");
        assert!(Config::from_env().is_err());

        clear();
    }
}
