use crate::auth::JwtConfig;

/// Default working directory when `WORK_DIR` is unset
pub const DEFAULT_WORK_DIR: &str = "/var/lib/smartscan/store";

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | WORK_DIR | /var/lib/smartscan/store | working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | EXIT_PASS_SECRET | — | explicit exit-pass signing secret |
/// | APP_SECRET | — | general application secret (signing fallback) |
///
/// In production an exit-pass signing secret is required; development falls
/// back to a built-in key with a warning (see `ExitPassSigner::from_config`).
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Explicit exit-pass signing secret
    pub exit_pass_secret: Option<String>,
    /// General application secret
    pub app_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| DEFAULT_WORK_DIR.into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            exit_pass_secret: std::env::var("EXIT_PASS_SECRET").ok(),
            app_secret: std::env::var("APP_SECRET").ok(),
        }
    }

    /// Database file path inside the working directory
    pub fn db_path(&self) -> String {
        format!("{}/store.db", self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
