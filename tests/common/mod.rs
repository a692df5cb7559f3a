#![allow(dead_code)]

use axum::extract::connect_info::MockConnectInfo;
use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use snaplink::application::services::{AnalyticsService, AuthService, Claims, LinkService};
use snaplink::domain::click_event::ClickEvent;
use snaplink::infrastructure::cache::MemoryCache;
use snaplink::infrastructure::persistence::MemoryStore;
use snaplink::routes::build_router;
use snaplink::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const JWT_SECRET: &str = "test-access-secret";
pub const BASE_URL: &str = "http://sho.rt";

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_state(
    behind_proxy: bool,
) -> (AppState, Arc<MemoryStore>, mpsc::Receiver<ClickEvent>) {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::new(1_000, 60));
    let (tx, rx) = mpsc::channel(100);

    let state = AppState {
        link_service: Arc::new(LinkService::new(store.clone(), cache.clone(), BASE_URL)),
        analytics_service: Arc::new(AnalyticsService::new(store.clone(), store.clone())),
        auth_service: Arc::new(AuthService::new(JWT_SECRET)),
        cache,
        click_sender: tx,
        behind_proxy,
    };

    (state, store, rx)
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(false)
}

pub fn spawn_app_with(behind_proxy: bool) -> TestApp {
    let (state, store, clicks) = create_test_state(behind_proxy);
    let peer: SocketAddr = "127.0.0.1:12345".parse().unwrap();

    let app = build_router(state, None)
        .unwrap()
        .layer(MockConnectInfo(peer));

    TestApp {
        server: TestServer::new(app).unwrap(),
        store,
        clicks,
    }
}

pub fn mint_token(user_id: &str) -> String {
    let claims = Claims {
        id: user_id.to_string(),
        email: Some(format!("{user_id}@example.com")),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", mint_token(user_id))
}

/// Creates a link through the API and returns the response body.
pub async fn create_link(
    server: &TestServer,
    user_id: &str,
    long_url: &str,
    custom_alias: Option<&str>,
) -> Value {
    let mut body = json!({ "longUrl": long_url, "topic": "misc" });
    if let Some(alias) = custom_alias {
        body["customAlias"] = json!(alias);
    }

    let response = server
        .post("/api/short/shortURL")
        .add_header("Authorization", bearer(user_id))
        .json(&body)
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}
