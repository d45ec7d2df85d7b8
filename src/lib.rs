pub mod command_handler;
pub mod commands;
pub mod config;
pub mod custom_id;
pub mod directory;
pub mod http_server;
pub mod invoker;
pub mod message_components;
pub mod rate_limiter;
pub mod reply;
pub mod roles;
