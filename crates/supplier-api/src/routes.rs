//! Router assembly

use axum::{
    routing::{get, post},
    Router,
};
use supplier_shared::constants::{LOGIN_ROUTE, REGISTER_ROUTE, SUPPLIER_ROUTE};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::{auth, health, supplier};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let supplier_item = format!("{}/{{id}}", SUPPLIER_ROUTE);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // User routes
        .route(REGISTER_ROUTE, post(auth::register))
        .route(LOGIN_ROUTE, post(auth::login))
        // Supplier routes
        .route(
            SUPPLIER_ROUTE,
            get(supplier::list_suppliers).post(supplier::create_supplier),
        )
        .route(
            &supplier_item,
            get(supplier::get_supplier)
                .put(supplier::update_supplier)
                .delete(supplier::delete_supplier),
        )
        .with_state(state)
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
