//! Server State
//!
//! Shared application state handed to every request handler. All services
//! are constructed once by [`ServerState::initialize`] and injected; there
//! is no ambient global database handle.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderLifecycle;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    /// Embedded database handle (cheap to clone)
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    /// Checkout and status-transition engine
    pub lifecycle: OrderLifecycle,
}

impl ServerState {
    /// Build the full application state from configuration
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_service = DbService::new(&db_dir).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let lifecycle = OrderLifecycle::new(db_service.db.clone());

        Ok(Self {
            config: Arc::new(config.clone()),
            db: db_service.db,
            jwt_service,
            lifecycle,
        })
    }

    /// Build state on top of an already-open database (used by tests)
    pub fn with_db(config: &Config, db: Surreal<Db>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            lifecycle: OrderLifecycle::new(db.clone()),
            db,
        }
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
