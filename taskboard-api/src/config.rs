/// Configuration management for the API server
///
/// Configuration comes from environment variables; a `.env` file is loaded
/// first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 5000)
/// - `API_BASE_PATH`: Prefix for REST routes (default: /api)
/// - `API_CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `API_PRODUCTION`: Enables HSTS (default: false)
/// - `API_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds, at least 1 (default: 30)
/// - `API_FORBIDDEN_STATUS`: Status for ownership failures, 401 or 403 (default: 401)
/// - `DATABASE_URL`: PostgreSQL connection string; unset selects the in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 characters)
/// - `RUST_LOG`: Log filter (default: taskboard_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Prefix every REST route is nested under
    pub base_path: String,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,

    /// Requests running longer than this are answered with 408
    pub request_timeout_secs: u64,

    /// Status code sent when the caller does not own a resource
    ///
    /// 401 keeps the historical contract; 403 is the opt-in alternative.
    pub forbidden_status: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            base_path: "/api".to_string(),
            cors_origins: vec!["*".to_string()],
            production: false,
            request_timeout_secs: 30,
            forbidden_status: 401,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL, `None` for the in-memory store
    pub url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Fails when `JWT_SECRET` is missing or short, or when a numeric or
    /// boolean variable doesn't parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let host = var("API_HOST").unwrap_or(defaults.host);
        let port = match var("API_PORT") {
            Some(port) => port.parse::<u16>()?,
            None => defaults.port,
        };

        let base_path = normalize_base_path(&var("API_BASE_PATH").unwrap_or(defaults.base_path));

        let cors_origins = match var("API_CORS_ORIGINS") {
            Some(origins) => origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let production = match var("API_PRODUCTION") {
            Some(value) => value.parse::<bool>()?,
            None => defaults.production,
        };

        let request_timeout_secs = match var("API_REQUEST_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>()?,
            None => defaults.request_timeout_secs,
        };
        if request_timeout_secs == 0 {
            anyhow::bail!("API_REQUEST_TIMEOUT_SECS must be at least 1");
        }

        let forbidden_status = match var("API_FORBIDDEN_STATUS") {
            Some(value) => value.parse::<u16>()?,
            None => defaults.forbidden_status,
        };
        if forbidden_status != 401 && forbidden_status != 403 {
            anyhow::bail!("API_FORBIDDEN_STATUS must be 401 or 403, got {}", forbidden_status);
        }

        let database_url = var("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value.parse::<u32>()?,
            None => 10,
        };

        let jwt_secret = var("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                base_path,
                cors_origins,
                production,
                request_timeout_secs,
                forbidden_status,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
        })
    }

    /// Development/test configuration with the given secret and defaults elsewhere
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::default(),
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: secret.into(),
            },
        }
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Status code for ownership failures
    pub fn forbidden_status(&self) -> StatusCode {
        StatusCode::from_u16(self.api.forbidden_status).unwrap_or(StatusCode::UNAUTHORIZED)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }
}

/// `"api/"` → `"/api"`, `"/"` or `""` → `""`
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
