#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use kinauna_api::auth::{generate_jwt, Claims};
use kinauna_api::config::{AppConfig, DatabaseBackend};
use kinauna_api::database::models::{TimeLineItem, UserInfo};
use kinauna_api::database::{MemoryRecordStore, RecordStore};
use kinauna_api::services::{NotificationError, PushNotifier, WebNotifier};
use kinauna_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const MOM: &str = "mom@example.com";
pub const DAD: &str = "dad@example.com";
pub const GRAN: &str = "gran@example.com";

/// One recorded notifier invocation
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub title: String,
    pub item: TimeLineItem,
    pub recipients: Vec<String>,
}

#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<SentNotification>>,
}

#[async_trait]
impl PushNotifier for RecordingPush {
    async fn progeny_update_notification(
        &self,
        title: &str,
        _message: &str,
        item: &TimeLineItem,
        _icon_url: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(SentNotification {
            title: title.to_string(),
            item: item.clone(),
            recipients: recipients.to_vec(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingWeb {
    pub sent: Mutex<Vec<SentNotification>>,
}

#[async_trait]
impl WebNotifier for RecordingWeb {
    async fn send_item_notification(
        &self,
        item: &TimeLineItem,
        _actor: &UserInfo,
        title: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(SentNotification {
            title: title.to_string(),
            item: item.clone(),
            recipients: recipients.to_vec(),
        });
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.backend = DatabaseBackend::Memory;
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.security.enable_audit_logging = false;
    config.server.enable_request_logging = false;
    config.notifications.detach_async_observers = false;
    config.access.public_progeny_id = 2;
    config
}

/// In-process API over the memory store with recording notifiers
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub push: Arc<RecordingPush>,
    pub web: Arc<RecordingWeb>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let push = Arc::new(RecordingPush::default());
        let web = Arc::new(RecordingWeb::default());
        let state = AppState::new(config, store, push.clone(), web.clone());
        Self {
            router: app(state.clone()),
            state,
            push,
            web,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, as_user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = as_user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(email)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, as_user: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, as_user, None).await
    }

    pub async fn post(&self, uri: &str, as_user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, as_user, Some(body)).await
    }

    pub async fn put(&self, uri: &str, as_user: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, as_user, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, as_user: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, as_user, None).await
    }

    /// Creates a progeny administered by `admin` and returns its id
    pub async fn create_progeny(&self, admin: &str, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/progeny", Some(admin), serde_json::json!({ "name": name, "time_zone": "Europe/Oslo" }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    pub fn push_count(&self) -> usize {
        self.push.sent.lock().unwrap().len()
    }

    pub fn web_count(&self) -> usize {
        self.web.sent.lock().unwrap().len()
    }
}

pub fn token(email: &str) -> String {
    generate_jwt(&Claims::new(email, 1), JWT_SECRET).unwrap()
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Spawns the server binary on a free port with the memory backend
    pub fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_kinauna-api"))
            .env("APP_ENV", "development")
            .env("KINAUNA_API_PORT", port.to_string())
            .env("DATABASE_BACKEND", "memory")
            .env("JWT_SECRET", JWT_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
