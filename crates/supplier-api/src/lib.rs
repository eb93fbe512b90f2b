//! # Supplier API
//! 
//! HTTP handlers, extractors, DTOs, and the router.

pub mod handlers;
pub mod extractors;
pub mod dto;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
