use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Top-level configuration for the portal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub uploads: UploadConfig,
    pub documents: DocumentConfig,
    pub session: SessionConfig,
    pub accounts: AccountPolicyConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "5000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let database_path = PathBuf::from(var_or("APP_DATABASE_PATH", "app.db"));

        let upload_dir = PathBuf::from(var_or("APP_UPLOAD_DIR", "uploads"));
        let max_body_bytes = parse_number("APP_UPLOAD_MAX_BYTES", 16 * 1024 * 1024)?;

        let renderer_program = var_or("APP_PDF_RENDERER", "weasyprint");

        let secure_cookie = parse_flag("APP_SESSION_SECURE", false)?;
        let idle_minutes = parse_number("APP_SESSION_IDLE_MINUTES", 720)?;

        let auto_activate = parse_flag("APP_SIGNUP_AUTO_ACTIVATE", false)?;
        let seed_sample_data = parse_flag("APP_SEED_SAMPLE_DATA", false)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { database_path },
            uploads: UploadConfig {
                root: upload_dir,
                max_body_bytes,
            },
            documents: DocumentConfig { renderer_program },
            session: SessionConfig {
                secure_cookie,
                idle_minutes: idle_minutes as i64,
            },
            accounts: AccountPolicyConfig {
                auto_activate,
                seed_sample_data,
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_number(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { key, value: raw }),
        },
        Err(_) => Ok(default),
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

/// Location of the SQLite database. `:memory:` keeps everything in process.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub root: PathBuf,
    pub max_body_bytes: usize,
}

/// External HTML to PDF converter invoked as `<program> - -`.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub renderer_program: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secure_cookie: bool,
    pub idle_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secure_cookie: false,
            idle_minutes: 720,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountPolicyConfig {
    pub auto_activate: bool,
    pub seed_sample_data: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidFlag { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer (found '{value}')")
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{key} must be true/false (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
