use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/movements.json";
const DEFAULT_INSIGHTS_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_INSIGHTS_MODEL: &str = "gemini-2.0-flash";
const CONFIG_DIR: &str = "config";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Runtime environment: "development" or "production"
    #[serde(default = "default_env")]
    pub environment: String,

    /// Tracing filter directive (e.g. "info", "gestor_api=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format
    #[serde(default)]
    pub log_json: bool,

    /// Path of the JSON document holding the movement collection
    #[serde(default = "default_data_path")]
    #[validate(length(min = 1))]
    pub data_path: String,

    /// Base URL of the generative-text API used for insight summaries
    #[serde(default = "default_insights_api_url")]
    #[validate(url)]
    pub insights_api_url: String,

    /// API key for the summarization service; insights degrade to the
    /// fallback text when unset
    #[serde(default)]
    pub insights_api_key: String,

    /// Model name requested from the summarization service
    #[serde(default = "default_insights_model")]
    pub insights_model: String,

    /// Comma-separated list of allowed CORS origins; permissive in
    /// development when unset
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_env() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_data_path() -> String {
    DEFAULT_DATA_PATH.to_string()
}
fn default_insights_api_url() -> String {
    DEFAULT_INSIGHTS_API_URL.to_string()
}
fn default_insights_model() -> String {
    DEFAULT_INSIGHTS_MODEL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_env(),
            log_level: default_log_level(),
            log_json: false,
            data_path: default_data_path(),
            insights_api_url: default_insights_api_url(),
            insights_api_key: String::new(),
            insights_model: default_insights_model(),
            cors_allowed_origins: None,
        }
    }
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads configuration from `config/default.toml` (optional), an optional
/// environment-specific file, and `APP_`-prefixed environment variables,
/// in increasing order of precedence.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let cfg: AppConfig = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, env)).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build()?
        .try_deserialize()?;

    cfg.validate()
        .map_err(|err| ConfigError::Message(err.to_string()))?;

    info!(environment = %cfg.environment, "configuration loaded");
    Ok(cfg)
}

/// Installs the global tracing subscriber. Safe to call once per process.
pub fn init_tracing(log_level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
