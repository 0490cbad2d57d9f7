//! Demo HTTP API.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, form and query inputs)
//!     → demo.rs (handlers over lifecycle::Services)
//!     → response.rs (JSON views, error → status)
//! ```

pub mod demo;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
