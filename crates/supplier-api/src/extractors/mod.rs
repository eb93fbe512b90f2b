//! Request extractors

pub mod auth;
pub mod json;
pub mod path;

pub use auth::AuthenticatedUser;
pub use json::JsonBody;
pub use path::PathParam;
