use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use anyhow::{anyhow, Result};
use ed25519_dalek::{VerifyingKey, Signature, Verifier};
use log::{info, error, warn, debug};
use serenity::model::id::{GuildId, RoleId, UserId};
use std::sync::Arc;

use crate::commands::CommandHandler;
use crate::config::Config;
use crate::directory::RoleDirectory;
use crate::invoker::Invoker;
use crate::message_components::{MessageComponentHandler, FAILURE_MESSAGE, GUILD_ONLY};
use crate::reply::Reply;

pub struct AppState<D> {
    pub command_handler: CommandHandler<D>,
    pub component_handler: Arc<MessageComponentHandler<D>>,
    pub public_key: VerifyingKey,
}

impl<D> Clone for AppState<D> {
    fn clone(&self) -> Self {
        AppState {
            command_handler: self.command_handler.clone(),
            component_handler: self.component_handler.clone(),
            public_key: self.public_key,
        }
    }
}

#[derive(Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type")]
    pub interaction_type: u8,
    pub data: Option<Value>,
    pub guild_id: Option<String>,
    pub member: Option<MemberPayload>,
    pub id: String,
    pub application_id: String,
}

#[derive(Deserialize)]
pub struct MemberPayload {
    pub user: UserPayload,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Deserialize)]
pub struct UserPayload {
    pub id: String,
    pub username: String,
}

impl InteractionPayload {
    /// The guild member behind the interaction, if it came from a guild.
    pub fn invoker(&self) -> Option<Invoker> {
        let guild_id = self.guild_id.as_deref()?.parse().ok().map(GuildId)?;
        let member = self.member.as_ref()?;
        let user_id = member.user.id.parse().ok().map(UserId)?;
        let roles = member
            .roles
            .iter()
            .filter_map(|id| id.parse().ok().map(RoleId))
            .collect();

        Some(Invoker {
            guild_id,
            user_id,
            user_name: member.user.username.clone(),
            roles,
        })
    }

    fn data_str(&self, key: &str) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.get(key)).and_then(|v| v.as_str())
    }
}

// Discord interaction types
const PING: u8 = 1;
const APPLICATION_COMMAND: u8 = 2;
const MESSAGE_COMPONENT: u8 = 3;

// Discord interaction response types
const PONG: u8 = 1;
const DEFERRED_UPDATE_MESSAGE: u8 = 6;

pub fn parse_public_key(discord_public_key: &str) -> Result<VerifyingKey> {
    let public_key_bytes = hex::decode(discord_public_key.trim())
        .map_err(|e| anyhow!("Failed to decode Discord public key: {}", e))?;

    let public_key_len = public_key_bytes.len();
    let public_key_bytes: [u8; 32] = public_key_bytes
        .try_into()
        .map_err(|_| anyhow!("Public key must be 32 bytes, got {}", public_key_len))?;

    VerifyingKey::from_bytes(&public_key_bytes)
        .map_err(|e| anyhow!("Invalid Discord public key: {}", e))
}

pub fn create_server<D: RoleDirectory + 'static>(
    config: &Config,
    command_handler: CommandHandler<D>,
    component_handler: MessageComponentHandler<D>,
) -> Result<Router> {
    info!("🔑 Loading Discord public key for signature verification");
    let discord_public_key = config.discord_public_key.as_ref()
        .ok_or_else(|| anyhow!("DISCORD_PUBLIC_KEY environment variable is required for HTTP interactions"))?;
    let public_key = parse_public_key(discord_public_key)?;
    info!("✅ Discord public key loaded and validated successfully");

    let state = AppState {
        command_handler,
        component_handler: Arc::new(component_handler),
        public_key,
    };

    let app = Router::new()
        .route("/", get(health_check))
        .route("/interactions", post(handle_interaction::<D>))
        .with_state(state);

    Ok(app)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Role bot HTTP server is running",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn handle_interaction<D: RoleDirectory + 'static>(
    State(state): State<AppState<D>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let request_id = uuid::Uuid::new_v4();
    debug!("[{}] 📥 HTTP interaction received | Body length: {}", request_id, body.len());

    if let Err(e) = verify_discord_signature(&state.public_key, &headers, &body) {
        warn!("[{}] ❌ Signature verification failed: {}", request_id, e);
        return Err(StatusCode::UNAUTHORIZED);
    }

    let interaction: InteractionPayload = serde_json::from_slice(&body)
        .map_err(|e| {
            error!("[{}] Failed to parse interaction payload: {}", request_id, e);
            StatusCode::BAD_REQUEST
        })?;

    debug!(
        "[{}] Interaction {} for application {} (type {})",
        request_id, interaction.id, interaction.application_id, interaction.interaction_type
    );

    let outcome = match interaction.interaction_type {
        PING => {
            info!("[{}] Received ping interaction", request_id);
            return Ok(Json(json!({ "type": PONG })));
        }
        APPLICATION_COMMAND => {
            let name = interaction.data_str("name").unwrap_or("unknown");
            info!("[{}] Received application command: {}", request_id, name);
            state
                .command_handler
                .run(name, interaction.invoker().as_ref())
                .await
                .map(Some)
        }
        MESSAGE_COMPONENT => {
            let custom_id = interaction.data_str("custom_id").unwrap_or_default();
            info!("[{}] Received message component: {}", request_id, custom_id);
            match interaction.invoker() {
                Some(invoker) => state.component_handler.handle_button(&invoker, custom_id).await,
                None => Ok(Some(Reply::notice(GUILD_ONLY))),
            }
        }
        other => {
            warn!("[{}] Unknown interaction type: {}", request_id, other);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let body = match outcome {
        Ok(Some(reply)) => reply.to_json(),
        // Not one of our buttons; acknowledge without touching the message.
        Ok(None) => json!({ "type": DEFERRED_UPDATE_MESSAGE }),
        Err(e) => {
            error!("[{}] Error handling interaction: {}", request_id, e);
            Reply::notice(FAILURE_MESSAGE).to_json()
        }
    };

    Ok(Json(body))
}

/// Checks the ed25519 signature Discord puts over `timestamp || body`.
pub fn verify_discord_signature(
    public_key: &VerifyingKey,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<()> {
    let signature_header = headers
        .get("x-signature-ed25519")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| anyhow!("Missing signature header"))?;

    let timestamp_header = headers
        .get("x-signature-timestamp")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| anyhow!("Missing timestamp header"))?;

    let signature_bytes = hex::decode(signature_header)
        .map_err(|e| anyhow!("Invalid signature format: {}", e))?;

    let signature_bytes_len = signature_bytes.len();
    let signature_array: [u8; 64] = signature_bytes.try_into()
        .map_err(|_| anyhow!("Signature must be 64 bytes, got {}", signature_bytes_len))?;
    let signature = Signature::from_bytes(&signature_array);

    let message = [timestamp_header.as_bytes(), body].concat();
    public_key
        .verify(&message, &signature)
        .map_err(|e| anyhow!("Signature verification failed: {}", e))?;

    Ok(())
}

pub async fn start_http_server<D: RoleDirectory + 'static>(
    config: Config,
    command_handler: CommandHandler<D>,
    component_handler: MessageComponentHandler<D>,
) -> Result<()> {
    let app = create_server(&config, command_handler, component_handler)?;

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("HTTP server starting on port {}", config.http_port);
    info!("Interactions endpoint: http://0.0.0.0:{}/interactions", config.http_port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
