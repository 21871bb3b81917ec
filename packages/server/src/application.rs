use std::sync::Arc;

use anyhow::Context as _;
use api::{build_schema, MemoBroker, MemoService, TokenKeys};
use store::{MemoStore, MemoryStore, PgStore};

use crate::routes::{router, AppState};
use crate::settings::{self, Settings};

/// Open the configured store, wire the memo service and serve until Ctrl-C.
pub async fn launch(settings: Settings) -> anyhow::Result<()> {
    let store = open_store(&settings.database).await?;
    let broker = MemoBroker::new();
    let service = MemoService::new(store, broker, settings.policy());

    if settings.auth.secret == settings::DEV_SECRET {
        tracing::warn!("auth.secret is the development default; set MEMO_AUTH__SECRET in production");
    }
    let state = AppState {
        schema: build_schema(service),
        keys: TokenKeys::new(settings.auth.secret.as_bytes()),
    };

    let listener = tokio::net::TcpListener::bind(&settings.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.addr))?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn open_store(database: &settings::Database) -> anyhow::Result<Arc<dyn MemoStore>> {
    let Some(url) = database.url.as_deref() else {
        tracing::warn!("No database.url configured, memos are kept in memory");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let store = PgStore::connect(url, database.max_connections)
        .await
        .context("Failed to connect to database")?;
    store.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to PostgreSQL memo store");
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
