use crate::survey::{CatalogSource, CompletionPolicy, DEFAULT_MINIMUM_SUBMISSIONS};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ADVISOR_ENDPOINT: &str = "https://api.cohere.ai/v1/chat";
pub const DEFAULT_ADVISOR_MODEL: &str = "command-r-plus";
const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 30;

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
    pub survey: SurveyConfig,
    pub advisor: AdvisorConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            survey: SurveyConfig::from_env()?,
            advisor: AdvisorConfig::from_env()?,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Question source and scoring policy.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    pub questions_path: Option<PathBuf>,
    pub completion_policy: CompletionPolicy,
    pub minimum_submissions: usize,
}

impl SurveyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let questions_path = non_empty_var("THRIVYA_QUESTIONS_PATH").map(PathBuf::from);

        let completion_policy = match non_empty_var("THRIVYA_COMPLETION_POLICY") {
            Some(raw) => {
                CompletionPolicy::parse(&raw).ok_or(ConfigError::InvalidCompletionPolicy(raw))?
            }
            None => CompletionPolicy::default(),
        };

        let minimum_submissions = match non_empty_var("THRIVYA_MIN_SUBMISSIONS") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidMinimumSubmissions)?,
            None => DEFAULT_MINIMUM_SUBMISSIONS,
        };

        Ok(Self {
            questions_path,
            completion_policy,
            minimum_submissions,
        })
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::from_optional_path(self.questions_path.clone())
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            questions_path: None,
            completion_policy: CompletionPolicy::default(),
            minimum_submissions: DEFAULT_MINIMUM_SUBMISSIONS,
        }
    }
}

/// Report generator endpoint and credentials. A missing key is not an error.
#[derive(Clone)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl AdvisorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match non_empty_var("COHERE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidAdvisorTimeout)?,
            None => DEFAULT_ADVISOR_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint: non_empty_var("COHERE_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ADVISOR_ENDPOINT.to_string()),
            model: non_empty_var("COHERE_MODEL")
                .unwrap_or_else(|| DEFAULT_ADVISOR_MODEL.to_string()),
            api_key: non_empty_var("COHERE_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ADVISOR_ENDPOINT.to_string(),
            model: DEFAULT_ADVISOR_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_ADVISOR_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCompletionPolicy(String),
    InvalidMinimumSubmissions,
    InvalidAdvisorTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCompletionPolicy(value) => write!(
                f,
                "THRIVYA_COMPLETION_POLICY must be 'partial' or 'complete' (got '{}')",
                value
            ),
            ConfigError::InvalidMinimumSubmissions => {
                write!(f, "THRIVYA_MIN_SUBMISSIONS must be a positive integer")
            }
            ConfigError::InvalidAdvisorTimeout => {
                write!(f, "COHERE_TIMEOUT_SECS must be a positive number of seconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
