//! End-to-end smoke tests for the full timer24hd stack.
//!
//! Each test wires the complete application (in-memory `SQLite` local store,
//! simulated home, real engine, real axum router) and exercises the HTTP layer
//! via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use timer24h_adapter_http_axum::router;
use timer24h_adapter_http_axum::state::AppState;
use timer24h_adapter_storage_sqlite_sqlx::{Config, SqliteLocalStore};
use timer24h_adapter_virtual::{VirtualHome, VirtualHost};
use timer24h_app::engine::{EngineSettings, TimerEngine};
use timer24h_app::event_bus::EngineEvent;
use timer24h_app::services::persistence::Tier;
use timer24h_domain::config::CardConfig;
use tokio::sync::broadcast;
use tower::ServiceExt;

type Engine = TimerEngine<VirtualHost<SqliteLocalStore>>;

struct Stack {
    home: Arc<VirtualHome>,
    local: SqliteLocalStore,
}

impl Stack {
    async fn new(connected: bool) -> Self {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .expect("in-memory database should initialise");

        let home = Arc::new(VirtualHome::default());
        home.set_connected(connected);
        Self {
            home,
            local: SqliteLocalStore::new(db.pool().clone()),
        }
    }

    async fn engine(&self, card: serde_json::Value) -> Arc<Engine> {
        let host = VirtualHost::new(Arc::clone(&self.home), self.local.clone());
        let engine = TimerEngine::new(&host, CardConfig::stub(), EngineSettings::default());
        engine
            .set_config(&card)
            .await
            .expect("card configuration should be an object");
        Arc::new(engine)
    }
}

fn app(engine: &Arc<Engine>) -> axum::Router {
    router::build(AppState::new(Arc::clone(engine)))
}

async fn send(app: axum::Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn next_persisted(events: &mut broadcast::Receiver<EngineEvent>) -> Tier {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(EngineEvent::Persisted { tier }) = events.recv().await {
                return tier;
            }
        }
    })
    .await
    .expect("the toggled grid should be persisted")
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let stack = Stack::new(true).await;
    let engine = stack.engine(serde_json::json!({})).await;

    let resp = app(&engine)
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_save_toggled_slot_to_remote_document_when_connected() {
    let stack = Stack::new(true).await;
    let engine = stack
        .engine(serde_json::json!({"storage_key": "input_text.boiler_schedule"}))
        .await;
    let mut events = engine.subscribe();

    let (status, json) = send(app(&engine), "POST", "/api/slots/7/0/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active"], true);

    assert_eq!(next_persisted(&mut events).await, Tier::Document);
    let text = stack
        .home
        .user_data("input_text.boiler_schedule")
        .expect("document should be stored");
    let document: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(document["timeSlots"][14]["active"], true);

    let (_, status) = send(app(&engine), "GET", "/api/status").await;
    assert_eq!(status["sync"], "synced");
    assert_eq!(status["active_slots"], 1);
}

#[tokio::test]
async fn should_restore_schedule_from_local_store_when_disconnected() {
    let stack = Stack::new(false).await;
    let card = serde_json::json!({"storage_key": "kitchen", "allow_local_fallback": true});

    let first = stack.engine(card.clone()).await;
    let mut events = first.subscribe();
    let (status, _) = send(app(&first), "POST", "/api/slots/22/30/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next_persisted(&mut events).await, Tier::Local);

    let second = stack.engine(card).await;
    let (_, slots) = send(app(&second), "GET", "/api/slots").await;
    let active: Vec<_> = slots
        .as_array()
        .unwrap()
        .iter()
        .filter(|slot| slot["active"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["hour"], 22);
    assert_eq!(active[0]["minute"], 30);

    let (_, status) = send(app(&second), "GET", "/api/status").await;
    assert_eq!(status["sync"], "local");
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_switch_actuator_on_when_armed_slot_evaluated() {
    let stack = Stack::new(true).await;
    let engine = stack
        .engine(serde_json::json!({
            "entities": ["switch.boiler"],
            "storage_key": "input_text.boiler_schedule",
        }))
        .await;
    assert_eq!(stack.home.state_of("switch.boiler").as_deref(), Some("off"));

    let (status, _) = send(app(&engine), "POST", "/api/slots/10/0/toggle").await;
    assert_eq!(status, StatusCode::OK);

    let tick = engine.tick_at(chrono_time(10, 12));
    assert!(tick.verdict.active);
    let report = tick
        .dispatch
        .expect("first evaluation always dispatches")
        .await
        .unwrap();
    assert_eq!(report.sent, 1);
    assert_eq!(stack.home.state_of("switch.boiler").as_deref(), Some("on"));
}

#[tokio::test]
async fn should_reload_configuration_over_http() {
    let stack = Stack::new(true).await;
    let engine = stack.engine(serde_json::json!({})).await;

    let resp = app(&engine)
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/config")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title": "Porch", "entities": ["light.porch"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (_, config) = send(app(&engine), "GET", "/api/config").await;
    assert_eq!(config["title"], "Porch");
    assert_eq!(config["entities"], serde_json::json!(["light.porch"]));
}

fn chrono_time(hour: u32, minute: u32) -> chrono::NaiveTime {
    chrono::NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}
