//! HTTP surface: routing, cookie transport, and error mapping.

pub mod response;
pub mod routes;

pub use response::ApiError;
pub use routes::{AppState, COOKIE_NAME, router};
