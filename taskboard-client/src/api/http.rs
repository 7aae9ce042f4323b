/// HTTP client for the Taskboard REST API
///
/// Wraps every endpoint with typed requests and responses. Signup and login
/// store the returned tokens; later calls send the access token as a bearer
/// credential.
///
/// Every request is bounded by [`ClientConfig::timeout`]. There are no
/// retries: a failure is returned to the caller as-is.
///
/// Non-2xx responses become [`ClientError::Api`] carrying the server's error
/// code and message.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use taskboard_shared::models::{Project, Task, UserProfile};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{NewTask, TaskApi, TaskChanges};
use crate::error::{ClientError, ClientResult};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root including the base path, e.g. `http://127.0.0.1:5000/api`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Signup/login response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
    pub refresh_token: String,
}

/// Server health report
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[allow(dead_code)]
    message: String,
}

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    refresh: Option<String>,
}

/// Typed Taskboard API client
pub struct TaskboardClient {
    http: reqwest::Client,
    base_url: String,
    tokens: RwLock<Tokens>,
}

impl TaskboardClient {
    /// Creates a client for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_config(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens: RwLock::new(Tokens::default()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Uses an access token obtained elsewhere
    pub async fn set_token(&self, token: impl Into<String>) {
        self.tokens.write().await.access = Some(token.into());
    }

    /// Current access token, if signed in
    pub async fn token(&self) -> Option<String> {
        self.tokens.read().await.access.clone()
    }

    /// Forgets both tokens
    pub async fn logout(&self) {
        *self.tokens.write().await = Tokens::default();
    }

    /// Creates an account and signs in as it
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ClientResult<AuthSession> {
        let request = self
            .request(Method::POST, "/auth/signup")
            .json(&json!({ "name": name, "email": email, "password": password }));

        let session: AuthSession = self.send(request).await?;
        self.store_session(&session).await;
        Ok(session)
    }

    /// Signs in with email and password
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        let request = self
            .request(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }));

        let session: AuthSession = self.send(request).await?;
        self.store_session(&session).await;
        Ok(session)
    }

    /// Exchanges the stored refresh token for a new access token
    pub async fn refresh(&self) -> ClientResult<String> {
        let refresh_token = self
            .tokens
            .read()
            .await
            .refresh
            .clone()
            .ok_or(ClientError::NotSignedIn)?;

        let request = self
            .request(Method::POST, "/auth/refresh")
            .json(&json!({ "refreshToken": refresh_token }));

        let body: TokenBody = self.send(request).await?;
        self.set_token(body.token.clone()).await;
        Ok(body.token)
    }

    /// Fetches `/health`, which sits outside the API base path
    pub async fn health(&self, server_url: &str) -> ClientResult<HealthStatus> {
        let url = format!("{}/health", server_url.trim_end_matches('/'));
        self.send(self.http.get(url)).await
    }

    pub async fn list_projects(&self) -> ClientResult<Vec<Project>> {
        let request = self.authed(Method::GET, "/projects").await?;
        self.send(request).await
    }

    pub async fn create_project(&self, name: &str) -> ClientResult<Project> {
        let request = self
            .authed(Method::POST, "/projects")
            .await?
            .json(&json!({ "name": name }));
        self.send(request).await
    }

    pub async fn get_project(&self, id: Uuid) -> ClientResult<Project> {
        let request = self.authed(Method::GET, &format!("/projects/{}", id)).await?;
        self.send(request).await
    }

    /// Deletes a project together with its tasks
    pub async fn delete_project(&self, id: Uuid) -> ClientResult<()> {
        let request = self
            .authed(Method::DELETE, &format!("/projects/{}", id))
            .await?;
        let _: MessageBody = self.send(request).await?;
        Ok(())
    }

    async fn store_session(&self, session: &AuthSession) {
        let mut tokens = self.tokens.write().await;
        tokens.access = Some(session.token.clone());
        tokens.refresh = Some(session.refresh_token.clone());
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn authed(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.token().await.ok_or(ClientError::NotSignedIn)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "API response");

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => (error.error, error.message),
            Err(_) => ("unknown".to_string(), body),
        };

        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authed(method, path).await?.json(body);
        self.send(request).await
    }
}

#[async_trait]
impl TaskApi for TaskboardClient {
    async fn list_tasks(&self, project_id: Uuid) -> ClientResult<Vec<Task>> {
        let request = self
            .authed(Method::GET, &format!("/tasks/projects/{}/tasks", project_id))
            .await?;
        self.send(request).await
    }

    async fn create_task(&self, task: &NewTask) -> ClientResult<Task> {
        self.send_json(Method::POST, "/tasks", task).await
    }

    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> ClientResult<Task> {
        self.send_json(Method::PUT, &format!("/tasks/{}", id), changes)
            .await
    }

    async fn delete_task(&self, id: Uuid) -> ClientResult<()> {
        let request = self.authed(Method::DELETE, &format!("/tasks/{}", id)).await?;
        let _: MessageBody = self.send(request).await?;
        Ok(())
    }
}
