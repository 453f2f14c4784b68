//! Server state — shared singleton references for all services

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{CheckoutService, EntropySource, ExitPassSigner, VerifyService};

/// Holds the connection pool and service singletons behind `Arc`, so clones
/// are cheap and handlers can share everything through axum state.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: SqlitePool,
    pub jwt: Arc<JwtService>,
    pub checkout: Arc<CheckoutService>,
    pub verify: Arc<VerifyService>,
}

impl ServerState {
    /// Initialize all services from configuration.
    ///
    /// Fails fast on an unreachable database or, in production, on a
    /// missing exit-pass signing secret.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db = DbService::new(&config.db_path())
            .await
            .map_err(|e| anyhow::anyhow!("Database initialization failed: {e}"))?;

        let signer = Arc::new(ExitPassSigner::from_config(config)?);
        let entropy = Arc::new(EntropySource);

        let checkout = Arc::new(CheckoutService::new(
            db.pool.clone(),
            signer.clone(),
            entropy,
        ));
        let verify = Arc::new(VerifyService::new(db.pool.clone(), signer));

        Ok(Self {
            config: Arc::new(config.clone()),
            db: db.pool,
            jwt: Arc::new(JwtService::with_config(config.jwt.clone())),
            checkout,
            verify,
        })
    }
}
