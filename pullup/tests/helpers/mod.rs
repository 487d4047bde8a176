#![allow(dead_code)]

use pullup_client::mock::MockLatency;
use pullup_client::token_store::{FileTokenStore, TokenStore};
use pullup_client::ApiProvider;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

pub const STUDENT_TOKEN: &str = "student_42_1690000000";
pub const ORG_TOKEN: &str = "org_7_1690000000";

pub struct TestApp {
    pub server: MockServer,
    pub api: ApiProvider,
    pub tokens: Arc<FileTokenStore>,
    _dir: TempDir,
}

impl TestApp {
    pub fn token(&self) -> Option<String> {
        self.tokens.token()
    }
}

fn token_store(dir: &TempDir, token: Option<&str>) -> Arc<FileTokenStore> {
    let tokens = Arc::new(FileTokenStore::new(dir.path().join("session")));
    if let Some(token) = token {
        tokens.set_token(token);
    }
    tokens
}

/// A provider on the real backend, pointed at a fresh mock http server.
pub async fn spawn_app(token: Option<&str>) -> TestApp {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let tokens = token_store(&dir, token);

    let api = ApiProvider::real(&server.uri(), Duration::from_secs(5), tokens.clone()).unwrap();

    TestApp {
        server,
        api,
        tokens,
        _dir: dir,
    }
}

/// A provider on the in-memory backend, without artificial delays.
pub fn mock_app() -> (ApiProvider, TempDir) {
    let dir = TempDir::new().unwrap();
    let tokens = token_store(&dir, None);
    (ApiProvider::mock(MockLatency::none(), tokens), dir)
}

pub fn backend_event(id: i64) -> Value {
    json!({
        "event_id": id,
        "org_id": 7,
        "org_name": "ACM",
        "title": format!("Event {id}"),
        "description": "Snacks provided",
        "location": "Hall 1",
        "date": "03/14/2025",
        "time": "6:30 PM",
        "image_url": "https://img.example.edu/e.png",
        "is_public": true,
        "participant_count": 3,
        "created_at": "2025-02-01T10:00:00Z"
    })
}
