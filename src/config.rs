//! Runtime configuration.
//!
//! Values resolve in order: built-in defaults, an optional `inmobot.toml`
//! in the working directory, `INMOBOT__*` environment variables, and
//! finally the standalone variables the original deployment used
//! (`ANTHROPIC_API_KEY`, `GREEN_API_INSTANCE`, `GREEN_API_TOKEN`, `PORT`,
//! `DATABASE_PATH`). Later sources win.

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::agent::DEFAULT_MAX_TOOL_ROUNDS;
use crate::llm::DEFAULT_MAX_TOKENS;
use crate::llm::anthropic::DEFAULT_MODEL;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub anthropic: AnthropicConfig,
    pub green_api: GreenApiConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GreenApiConfig {
    pub instance_id: String,
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub max_tool_rounds: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default(
                "database.path",
                default_database_path().to_string_lossy().into_owned(),
            )?
            .set_default("anthropic.api_key", "")?
            .set_default("anthropic.model", DEFAULT_MODEL)?
            .set_default("anthropic.max_tokens", i64::from(DEFAULT_MAX_TOKENS))?
            .set_default("green_api.instance_id", "")?
            .set_default("green_api.api_token", "")?
            .set_default("agent.max_tool_rounds", DEFAULT_MAX_TOOL_ROUNDS as i64)?
            .add_source(File::with_name("inmobot").required(false))
            .add_source(Environment::with_prefix("INMOBOT").separator("__"))
            .set_override_option("server.port", legacy_env("PORT"))?
            .set_override_option("database.path", legacy_env("DATABASE_PATH"))?
            .set_override_option("anthropic.api_key", legacy_env("ANTHROPIC_API_KEY"))?
            .set_override_option("green_api.instance_id", legacy_env("GREEN_API_INSTANCE"))?
            .set_override_option("green_api.api_token", legacy_env("GREEN_API_TOKEN"))?
            .build()?
            .try_deserialize()
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("inmobot").join("inmobot.db"))
        .unwrap_or_else(|| PathBuf::from("inmobot.db"))
}

/// Empty and whitespace-only values count as unset.
fn legacy_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
