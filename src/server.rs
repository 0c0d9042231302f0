//! Server wiring for the HTTP API and the MCP transports.
//!
//! Provides [`serve_http`] (JSON API plus MCP at `/mcp` on one listener) and
//! [`serve_stdio`] (MCP only), both sharing the state built by
//! [`setup_shared_state`].

use crate::api::{self, AppState};
use crate::config::WorkPilotConfig;
use crate::db;
use crate::tools::WorkPilotTools;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Shared setup: open DB and wrap it and the config in Arc for sharing.
fn setup_shared_state(config: WorkPilotConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    if config.llm.is_configured() {
        tracing::info!(model = %config.llm.model, url = %config.llm.api_url, "LLM endpoint configured");
    } else {
        tracing::warn!("LLM endpoint not configured, generation will use the mock model");
    }

    Ok(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: Arc::new(config),
    })
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: WorkPilotConfig) -> Result<()> {
    tracing::info!("starting WorkPilot MCP server on stdio");

    let state = setup_shared_state(config)?;

    let tools = WorkPilotTools::new(state.db, state.config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running, waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}

/// Serve the JSON API and the MCP Streamable HTTP endpoint on one listener.
pub async fn serve_http(config: WorkPilotConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %bind_addr, "starting WorkPilot HTTP server");

    let state = setup_shared_state(config)?;

    let db = Arc::clone(&state.db);
    let mcp_config = Arc::clone(&state.config);
    let mcp = rmcp::transport::streamable_http_server::StreamableHttpService::new(
        move || Ok(WorkPilotTools::new(db.clone(), mcp_config.clone())),
        rmcp::transport::streamable_http_server::session::local::LocalSessionManager::default()
            .into(),
        Default::default(),
    );

    let router = api::router(state).nest_service("/mcp", mcp);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "API at http://{bind_addr}/api, MCP at http://{bind_addr}/mcp");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
