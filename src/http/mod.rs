//! HTTP transport glue.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum, request id, tracing, timeout, body buffering)
//!     → exchange.rs (request + response-under-construction handle)
//!     → routing::Router::serve (handler or not-found responder)
//!     → exchange.rs (into_response)
//!     → Send to client
//! ```

pub mod exchange;
pub mod server;

pub use exchange::{not_found, Exchange};
pub use server::HttpServer;
