use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub memo: MemoConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            memo: MemoConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_MEMO_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MEMO_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection settings for the text-generation service that writes credit memos.
///
/// `api_key` is optional: without it the memo stage always renders the
/// deterministic template.
#[derive(Clone)]
pub struct MemoConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub max_attempts: u8,
}

impl MemoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let model = env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MEMO_MODEL.to_string());
        let base_url =
            env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_MEMO_BASE_URL.to_string());

        let temperature = parse_var::<f32>("LLM_TEMPERATURE", 0.3)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidNumber {
                key: "LLM_TEMPERATURE",
            });
        }

        let max_tokens = parse_var::<u32>("LLM_MAX_TOKENS", 1000)?;
        let timeout_secs = parse_var::<u64>("LLM_TIMEOUT_SECS", 20)?;
        let max_attempts = parse_var::<u8>("LLM_MAX_ATTEMPTS", 1)?.clamp(1, 2);

        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            max_attempts,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MEMO_MODEL.to_string(),
            base_url: DEFAULT_MEMO_BASE_URL.to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            timeout: Duration::from_secs(20),
            max_attempts: 1,
        }
    }
}

impl fmt::Debug for MemoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a valid number in its allowed range")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "OPENAI_API_KEY",
            "LLM_MODEL",
            "LLM_BASE_URL",
            "LLM_TEMPERATURE",
            "LLM_MAX_TOKENS",
            "LLM_TIMEOUT_SECS",
            "LLM_MAX_ATTEMPTS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.memo.has_credentials());
        assert_eq!(config.memo.model, DEFAULT_MEMO_MODEL);
        assert_eq!(config.memo.max_tokens, 1000);
        assert_eq!(config.memo.max_attempts, 1);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8000));
        reset_env();
    }

    #[test]
    fn memo_settings_are_read_and_clamped() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("OPENAI_API_KEY", "  sk-test  ");
        env::set_var("LLM_BASE_URL", "http://localhost:9999/v1/");
        env::set_var("LLM_MAX_ATTEMPTS", "5");
        env::set_var("LLM_TIMEOUT_SECS", "3");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.memo.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.memo.base_url, "http://localhost:9999/v1");
        assert_eq!(config.memo.max_attempts, 2);
        assert_eq!(config.memo.timeout, Duration::from_secs(3));
        assert!(!format!("{:?}", config.memo).contains("sk-test"));
        reset_env();
    }

    #[test]
    fn rejects_unparseable_memo_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LLM_MAX_TOKENS", "lots");

        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { key }) => assert_eq!(key, "LLM_MAX_TOKENS"),
            other => panic!("expected invalid number error, got {other:?}"),
        }
        reset_env();
    }
}
