//! # timer24hd — timer24h daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the simulated home and the local store (adapters)
//! - Construct the engine, apply the card configuration and attach it
//! - Build the axum router and serve it
//! - Detach the engine on graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use timer24h_adapter_http_axum::state::AppState;
use timer24h_adapter_storage_sqlite_sqlx::SqliteLocalStore;
use timer24h_adapter_virtual::{VirtualHome, VirtualHost};
use timer24h_app::engine::TimerEngine;
use timer24h_app::ports::LocalStore;
use timer24h_domain::config::CardConfig;
use timer24h_domain::error::TimerError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = timer24h_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let local = SqliteLocalStore::new(db.pool().clone());
    let initial = initial_card(&local).await?;

    // Host
    let home = Arc::new(VirtualHome::default());
    home.set_connected(config.home.connected);
    let host = VirtualHost::new(home, local.clone());

    // Engine
    let engine = Arc::new(TimerEngine::new(
        &host,
        initial,
        config.engine_settings(),
    ));
    let card = engine.set_config(&config.card_document()?).await?;
    remember_storage_key(&local, &card.storage_key).await?;
    engine.start();

    // HTTP
    let app = timer24h_adapter_http_axum::router::build(AppState::new(Arc::clone(&engine)));

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "timer24hd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    engine.stop();
    Ok(())
}

/// Local-store record holding the storage key of the last run.
const STORAGE_KEY_RECORD: &str = "timer24hd.storage_key";

/// Stub configuration carrying the storage key of the previous run, if any,
/// so a `[card]` without a key finds the schedule it saved before.
async fn initial_card(local: &impl LocalStore) -> Result<CardConfig, TimerError> {
    let mut card = CardConfig::stub();
    if let Some(key) = local.get(STORAGE_KEY_RECORD).await? {
        tracing::debug!(%key, "reusing storage key of previous run");
        card.storage_key = key;
    }
    Ok(card)
}

async fn remember_storage_key(local: &impl LocalStore, key: &str) -> Result<(), TimerError> {
    local.set(STORAGE_KEY_RECORD, key).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use timer24h_app::engine::EngineSettings;
    use timer24h_app::event_bus::EngineEvent;
    use timer24h_domain::storage_key;

    async fn local_store() -> SqliteLocalStore {
        let db = timer24h_adapter_storage_sqlite_sqlx::Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteLocalStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_generate_owned_key_on_first_run() {
        let local = local_store().await;

        let card = initial_card(&local).await.unwrap();

        assert!(storage_key::is_owned(&card.storage_key));
    }

    #[tokio::test]
    async fn should_reuse_remembered_key_on_next_run() {
        let local = local_store().await;
        let first = initial_card(&local).await.unwrap();
        remember_storage_key(&local, &first.storage_key).await.unwrap();

        let second = initial_card(&local).await.unwrap();

        assert_eq!(second.storage_key, first.storage_key);
    }

    #[tokio::test]
    async fn should_restore_schedule_after_restart_without_card_key() {
        let local = local_store().await;
        let home = Arc::new(VirtualHome::default());
        home.set_connected(false);
        let host = VirtualHost::new(Arc::clone(&home), local.clone());

        let first = TimerEngine::new(
            &host,
            initial_card(&local).await.unwrap(),
            EngineSettings::default(),
        );
        let card = first.set_config(&serde_json::json!({})).await.unwrap();
        remember_storage_key(&local, &card.storage_key).await.unwrap();
        let mut events = first.subscribe();
        first.toggle(6, 30);
        loop {
            if let EngineEvent::Persisted { .. } = events.recv().await.unwrap() {
                break;
            }
        }

        let second = TimerEngine::new(
            &host,
            initial_card(&local).await.unwrap(),
            EngineSettings::default(),
        );
        second.set_config(&serde_json::json!({})).await.unwrap();

        assert_eq!(second.config().storage_key, card.storage_key);
        assert!(second.grid().slot(6, 30).unwrap().active);
    }
}
