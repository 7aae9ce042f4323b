/// Common test utilities for integration tests
///
/// Every test gets its own router over a fresh [`MemoryStore`], so tests run
/// in parallel without a database and without cleanup.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::store::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the app and its backing store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

/// A signed-up user and their access token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

impl TestContext {
    /// Creates a context with default configuration (401 for ownership failures)
    pub fn new() -> Self {
        Self::with_config(Config::with_secret(TEST_SECRET))
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let app = build_router(AppState::new(store.clone(), config));
        Self { app, store }
    }

    /// Sends a raw request through the router
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a JSON request and returns status and parsed body
    ///
    /// An empty body parses as `Value::Null`.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self.send(builder.body(body).unwrap()).await;
        read_json(response).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, Some(token), None).await
    }

    /// Signs up a user and returns their tokens
    pub async fn signup(&self, name: &str, email: &str) -> TestUser {
        let (status, body) = self
            .post(
                "/api/auth/signup",
                None,
                json!({ "name": name, "email": email, "password": "secret123" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            email: body["user"]["email"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refreshToken"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a project and returns its JSON
    pub async fn create_project(&self, user: &TestUser, name: &str) -> Value {
        let (status, body) = self
            .post("/api/projects", Some(&user.token), json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create project failed: {}", body);
        body
    }

    /// Creates a task with the given title and extra fields
    pub async fn create_task(&self, user: &TestUser, project_id: &str, title: &str, extra: Value) -> Value {
        let mut body = json!({ "projectId": project_id, "title": title });
        if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }

        let (status, body) = self.post("/api/tasks", Some(&user.token), body).await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
        body
    }

    pub async fn list_tasks(&self, user: &TestUser, project_id: &str) -> (StatusCode, Value) {
        self.get(&format!("/api/tasks/projects/{}/tasks", project_id), &user.token)
            .await
    }
}

/// Reads a response body as JSON
pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
        })
    };

    (status, body)
}

/// String field of a JSON object
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}
