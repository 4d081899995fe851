//! HTTP handlers and their wire types.
//!
//! Handlers stay thin: extract, delegate to the token service / repositories
//! / purchase workflow, translate the result. Status-code decisions live in
//! [`crate::error`], not here.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Bearer;
use crate::error::ApiError;
use crate::purchase::PurchaseWorkflow;
use crate::AppState;
use vend_core::{validation::validate_emp_cd, CartItem, Product};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub code: i64,
}

#[derive(Debug, Serialize)]
pub struct TaxResponse {
    pub tax_id: i64,
    /// Decimal fraction, e.g. 0.1 for 10%.
    pub tax_rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub items: Vec<CartItem>,
    pub emp_cd: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub trd_id: i64,
    pub total_amt: i64,
    pub ttl_amt_ex_tax: i64,
    pub tax_amt: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - service banner.
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Vend POS API".to_string(),
    })
}

/// GET /health - liveness of the process and its database.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    if !state.db.health_check().await {
        return Err(ApiError::Unavailable);
    }

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// POST /auth/start - mint an anonymous session.
pub async fn start_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, ApiError> {
    let creds = state.tokens.start_session().await?;

    info!(user_id = %creds.user_id, "session issued");

    Ok(Json(SessionResponse {
        user_id: creds.user_id,
        access_token: creds.token,
        token_type: "bearer".to_string(),
    }))
}

/// POST /auth/logout - revoke a session token. Idempotent.
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Json<LogoutResponse> {
    let revoked = state.tokens.revoke(&payload.token).await;
    Json(LogoutResponse { revoked })
}

/// GET /products?code=X - first product matching the scan code.
pub async fn get_product(
    State(state): State<AppState>,
    _session: Bearer,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .find_by_code(query.code)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    Ok(Json(product))
}

/// GET /tax/{tax_id} - stored tax rate as a decimal fraction.
pub async fn get_tax(
    State(state): State<AppState>,
    _session: Bearer,
    Path(tax_id): Path<i64>,
) -> Result<Json<TaxResponse>, ApiError> {
    let record = state
        .db
        .taxes()
        .find_by_id(tax_id)
        .await?
        .ok_or(ApiError::NotFound("Tax rate"))?;

    Ok(Json(TaxResponse {
        tax_id: record.tax_id,
        tax_rate: record.rate().fraction(),
    }))
}

/// POST /purchase - record a purchase for the authenticated session.
///
/// The verified user id is deliberately not written to the transaction;
/// the schema has no such column and inventing the linkage here would be a
/// silent contract change.
pub async fn purchase(
    State(state): State<AppState>,
    Bearer(_user_id): Bearer,
    Json(payload): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    if let Some(emp_cd) = payload.emp_cd.as_deref() {
        validate_emp_cd(emp_cd).map_err(|e| ApiError::Invalid(e.to_string()))?;
    }

    let workflow = PurchaseWorkflow::new(
        Arc::new(state.db.clone()),
        state.config.store_cd.clone(),
        state.config.pos_no.clone(),
    );

    let outcome = workflow
        .execute(&payload.items, payload.emp_cd.as_deref())
        .await?;

    Ok(Json(PurchaseResponse {
        trd_id: outcome.trd_id,
        total_amt: outcome.total_amt,
        ttl_amt_ex_tax: outcome.ttl_amt_ex_tax,
        tax_amt: outcome.tax_amt,
    }))
}
