use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::analysis::AnalysisMode;

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
    pub desk: DeskConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let analysis_mode = match env::var("APP_ANALYSIS_MODE") {
            Ok(raw) => raw
                .parse::<AnalysisMode>()
                .map_err(|_| ConfigError::InvalidAnalysisMode(raw))?,
            Err(_) => AnalysisMode::Simulated,
        };
        let analysis_endpoint = env::var("APP_ANALYSIS_ENDPOINT")
            .unwrap_or_else(|_| DeskConfig::DEFAULT_ANALYSIS_ENDPOINT.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            desk: DeskConfig {
                analysis_mode,
                analysis_endpoint,
                progress_tick: millis_from_env("APP_PROGRESS_TICK_MS", 800)?,
                completion_delay: millis_from_env("APP_COMPLETION_DELAY_MS", 1000)?,
                chat_reply_delay: millis_from_env("APP_CHAT_REPLY_DELAY_MS", 1000)?,
                session_ttl: session_ttl_from_env()?,
            },
        })
    }
}

fn millis_from_env(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidDuration { name }),
        Err(_) => Ok(Duration::from_millis(default_ms)),
    }
}

fn session_ttl_from_env() -> Result<Duration, ConfigError> {
    match env::var("APP_SESSION_TTL_SECS") {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidSessionTtl(raw)),
        },
        Err(_) => Ok(DeskConfig::DEFAULT_SESSION_TTL),
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

/// Pacing and routing for the visitor-facing workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskConfig {
    pub analysis_mode: AnalysisMode,
    pub analysis_endpoint: String,
    pub progress_tick: Duration,
    pub completion_delay: Duration,
    pub chat_reply_delay: Duration,
    /// Idle time after which a visitor session is dropped.
    pub session_ttl: Duration,
}

impl DeskConfig {
    pub const DEFAULT_ANALYSIS_ENDPOINT: &'static str = "http://localhost:5000/analyze";
    pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

    /// How often idle sessions are swept: a quarter of the time to live, at most a minute.
    pub fn session_sweep_period(&self) -> Duration {
        (self.session_ttl / 4)
            .min(Duration::from_secs(60))
            .max(Duration::from_millis(1))
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            analysis_mode: AnalysisMode::Simulated,
            analysis_endpoint: Self::DEFAULT_ANALYSIS_ENDPOINT.to_string(),
            progress_tick: Duration::from_millis(800),
            completion_delay: Duration::from_millis(1000),
            chat_reply_delay: Duration::from_millis(1000),
            session_ttl: Self::DEFAULT_SESSION_TTL,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDuration { name: &'static str },
    InvalidAnalysisMode(String),
    InvalidSessionTtl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDuration { name } => {
                write!(f, "{name} must be a whole number of milliseconds")
            }
            ConfigError::InvalidAnalysisMode(value) => write!(
                f,
                "APP_ANALYSIS_MODE must be 'simulated' or 'remote' (got '{value}')"
            ),
            ConfigError::InvalidSessionTtl(value) => write!(
                f,
                "APP_SESSION_TTL_SECS must be a positive number of seconds (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDuration { .. }
            | ConfigError::InvalidAnalysisMode(_)
            | ConfigError::InvalidSessionTtl(_) => None,
        }
    }
}
