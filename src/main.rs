//! inmobot: a WhatsApp real-estate assistant.
//!
//! Green API webhooks come in, a Claude-driven agent searches the catalog,
//! schedules visits and captures leads through tool calls, and the answer
//! goes back out over WhatsApp.

mod agent;
mod config;
mod db;
mod llm;
mod models;
mod server;
mod stores;
mod tools;
mod whatsapp;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::agent::ConversationEngine;
use crate::config::Config;
use crate::db::Database;
use crate::llm::anthropic::AnthropicProvider;
use crate::server::AppState;
use crate::stores::{ConversationStore, LeadStore, ListingStore, VisitStore};
use crate::tools::ToolExecutor;
use crate::whatsapp::GreenApiClient;

#[derive(Parser)]
#[command(name = "inmobot", version, about = "WhatsApp real-estate assistant")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the webhook gateway
    Serve,
    /// Reset the listing catalog to the demo data
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("inmobot=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    let database = Database::connect(&config.database.path).await?;
    database.run_migrations().await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config, database).await,
        Command::Seed => run_seed(database).await,
    }
}

async fn run_server(config: Config, database: Database) -> anyhow::Result<()> {
    anyhow::ensure!(
        !config.anthropic.api_key.is_empty(),
        "anthropic.api_key is not configured (set ANTHROPIC_API_KEY)"
    );
    anyhow::ensure!(
        !config.green_api.instance_id.is_empty() && !config.green_api.api_token.is_empty(),
        "Green API credentials are not configured (set GREEN_API_INSTANCE and GREEN_API_TOKEN)"
    );

    let pool = database.pool().clone();
    let executor = ToolExecutor::new(
        ListingStore::new(pool.clone()),
        LeadStore::new(pool.clone()),
        VisitStore::new(pool.clone()),
    );
    let provider = Arc::new(AnthropicProvider::new(&config.anthropic.api_key));
    let engine = ConversationEngine::new(provider, executor, ConversationStore::new(pool))
        .with_model(&config.anthropic.model)
        .with_max_tokens(config.anthropic.max_tokens)
        .with_max_tool_rounds(config.agent.max_tool_rounds);
    let whatsapp = GreenApiClient::new(&config.green_api.instance_id, &config.green_api.api_token);

    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("invalid server.host '{}'", config.server.host))?;
    let addr = SocketAddr::from((host, config.server.port));

    server::serve(Arc::new(AppState::new(engine, whatsapp)), addr).await
}

async fn run_seed(database: Database) -> anyhow::Result<()> {
    let summary = db::seed::seed_listings(database.pool()).await?;
    println!(
        "Seeded {} listings ({} for sale, {} for rent)",
        summary.total, summary.for_sale, summary.for_rent
    );
    Ok(())
}
