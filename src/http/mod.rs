//! HTTP edge subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID, header extraction)
//!     → [routing planner decides: rewrite | redirect | not-found]
//!     → response.rs (redirect/404 responses, Set-Cookie)
//!     → rewrite: forward to the upstream renderer, relay its response
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
