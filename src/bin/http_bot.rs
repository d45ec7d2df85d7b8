use anyhow::Result;
use dotenvy::dotenv;
use log::{info, error};
use serenity::http::Http;
use serenity::model::id::GuildId;
use std::sync::Arc;
use std::time::Duration;

use slash_role::commands::{register_commands, CommandHandler};
use slash_role::config::Config;
use slash_role::directory::SerenityDirectory;
use slash_role::http_server::start_http_server;
use slash_role::message_components::MessageComponentHandler;
use slash_role::rate_limiter::RateLimiter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("🚀 Starting role bot HTTP server...");

    let http = Arc::new(Http::new_with_application_id(&config.discord_token, config.application_id));
    let directory = Arc::new(SerenityDirectory::connect(http.clone()).await?);
    info!("✅ Connected to Discord REST API");

    register_commands(&http, config.guild_id.map(GuildId)).await?;

    let command_handler = CommandHandler::new(directory.clone());
    let component_handler = MessageComponentHandler::new(
        directory,
        RateLimiter::new(
            config.role_toggle_limit,
            Duration::from_secs(config.role_toggle_window_secs),
        ),
    );

    info!("🌐 Starting HTTP server on port {}", config.http_port);

    if let Err(e) = start_http_server(config, command_handler, component_handler).await {
        error!("❌ HTTP server failed: {}", e);
        return Err(e);
    }

    Ok(())
}
