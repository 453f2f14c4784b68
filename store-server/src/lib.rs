//! Store Server - self-checkout transaction and exit-pass service
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # Config, state, server assembly
//! ├── auth/          # JWT identity extraction
//! ├── services/      # Checkout, audit policy, exit-pass signing, verification
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool and repositories
//! └── utils/         # Errors, logging, money arithmetic
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, create the working directory and start logging.
///
/// Called once at process start, before config is read.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR")
        .unwrap_or_else(|_| crate::core::config::DEFAULT_WORK_DIR.to_string());
    std::fs::create_dir_all(&work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_TO_FILE")
        .map(|v| v == "true")
        .unwrap_or(false)
        .then(|| format!("{work_dir}/logs"));
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
