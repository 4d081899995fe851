//! # Vend API
//!
//! HTTP server for the Vend POS backend.
//!
//! ## Request Flow
//! ```text
//! POST /auth/start ──► TokenService mints token ──► TokenRegistry
//!
//! POST /purchase ──► Bearer extractor verifies token
//!                         │
//!                         ▼
//!                    PurchaseWorkflow
//!                    header → details → totals
//!                         │
//!                         ▼
//!                    vend-db (SQLite)
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config::ApiConfig`]):
//! - `HTTP_PORT` - listen port (default: 8000)
//! - `DATABASE_PATH` - SQLite file (default: ./vend.db)
//! - `JWT_SECRET` - token signing secret
//! - `TOKEN_TTL_SECS` - session lifetime (default: 86400)
//! - `STORE_CD` / `POS_NO` - codes stamped on transaction headers

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod purchase;
pub mod registry;
pub mod routes;

use std::sync::Arc;

pub use config::ApiConfig;
pub use routes::app;

use crate::auth::TokenService;
use vend_db::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: TokenService,
    pub config: Arc<ApiConfig>,
}
