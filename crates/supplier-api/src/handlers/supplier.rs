// ============================================================================
// Supplier API - Supplier Handlers
// File: crates/supplier-api/src/handlers/supplier.rs
// ============================================================================
//! Supplier CRUD (/fornecedor)

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use supplier_core::{Supplier, SupplierDraft};
use supplier_shared::constants::{DELETE_SUPPLIER_CLAIM, SUPPLIER_ROUTE};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extractors::{AuthenticatedUser, JsonBody, PathParam};
use crate::state::AppState;

/// GET /fornecedor
pub async fn list_suppliers(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>, ApiError> {
    Ok(Json(state.suppliers.list().await?))
}

/// GET /fornecedor/{id}
pub async fn get_supplier(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<Supplier>, ApiError> {
    Ok(Json(state.suppliers.get(id).await?))
}

/// POST /fornecedor
pub async fn create_supplier(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<SupplierDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = state.suppliers.create(draft).await?;
    info!("Supplier {} created by {}", supplier.id, user.user_id);

    let location = format!("{}/{}", SUPPLIER_ROUTE, supplier.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(supplier)))
}

/// PUT /fornecedor/{id}
pub async fn update_supplier(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(draft): JsonBody<SupplierDraft>,
) -> Result<StatusCode, ApiError> {
    state.suppliers.replace(id, draft).await?;
    info!("Supplier {} replaced by {}", id, user.user_id);

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /fornecedor/{id} (requires the delete claim)
pub async fn delete_supplier(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require_claim(DELETE_SUPPLIER_CLAIM)?;

    state.suppliers.delete(id).await?;
    info!("Supplier {} deleted by {}", id, user.user_id);

    Ok(StatusCode::NO_CONTENT)
}
