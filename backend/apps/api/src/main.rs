//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod routes;

use gate::{GateConfig, SupabaseAuthProvider, SupabaseConfig};
use std::env;
use std::net::SocketAddr;
use summarize::{HuggingFaceSummarizer, SummarizeConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,gate=info,summarize=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Session gate
    let gate_config = GateConfig::from_env()?;
    let supabase_config = SupabaseConfig::from_env()?;
    tracing::info!(
        deployment = ?gate_config.deployment,
        storage_key = %supabase_config.storage_key,
        fail_closed = ?gate_config.fail_closed_prefixes,
        "Session gate configured"
    );
    let provider = SupabaseAuthProvider::new(supabase_config)?;

    // Summarization
    let summarizer = HuggingFaceSummarizer::new(SummarizeConfig::from_env()?)?;

    let app = routes::app(provider, gate_config, summarizer);

    // Start server
    let port = match env::var("PORT") {
        Ok(raw) => raw.parse::<u16>()?,
        Err(_) => 3000,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
