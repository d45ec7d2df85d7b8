use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use slash_role::commands::{register_commands, CommandHandler};
use slash_role::config::Config;
use slash_role::directory::SerenityDirectory;
use slash_role::message_components::{MessageComponentHandler, FAILURE_MESSAGE};
use slash_role::rate_limiter::RateLimiter;
use slash_role::reply::Reply;

struct Handler {
    command_handler: CommandHandler<SerenityDirectory>,
    component_handler: Arc<MessageComponentHandler<SerenityDirectory>>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Err(e) = register_commands(&ctx.http, self.guild_id).await {
            error!("❌ Failed to register slash commands: {}", e);
        } else {
            info!("✅ Successfully registered slash commands");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let failure = Reply::notice(FAILURE_MESSAGE);

        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self.command_handler.handle_slash_command(&ctx, &command).await {
                    error!("Error handling slash command '{}': {}", command.data.name, e);
                    if let Err(why) = command
                        .create_interaction_response(&ctx.http, |response| failure.write_response(response))
                        .await
                    {
                        error!("Failed to send error message: {}", why);
                    }
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self.component_handler.handle_component_interaction(&ctx, &component).await {
                    error!("Error handling component interaction '{}': {}", component.data.custom_id, e);
                    if let Err(why) = component
                        .create_interaction_response(&ctx.http, |response| failure.write_response(response))
                        .await
                    {
                        error!("Failed to send error message: {}", why);
                    }
                }
            }
            _ => {}
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting role bot...");

    let http = Arc::new(Http::new_with_application_id(&config.discord_token, config.application_id));
    let directory = Arc::new(SerenityDirectory::connect(http).await?);

    let handler = Handler {
        command_handler: CommandHandler::new(directory.clone()),
        component_handler: Arc::new(MessageComponentHandler::new(
            directory,
            RateLimiter::new(
                config.role_toggle_limit,
                Duration::from_secs(config.role_toggle_window_secs),
            ),
        )),
        guild_id: config.guild_id.map(GuildId),
    };

    // Interactions arrive without any privileged intents.
    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord_token, intents)
        .application_id(config.application_id)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Graceful shutdown");
        shard_manager.lock().await.shutdown_all().await;
    });

    info!("Establishing WebSocket connection to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!("Failed to establish gateway connection: {}", why));
    }

    Ok(())
}
