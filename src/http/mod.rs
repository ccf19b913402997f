//! HTTP host subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig
//!     → server.rs (registrar over an AxumHost)
//!     → host.rs (handler lookup, method merge, conflict check)
//!     → axum::Router + TraceLayer
//!
//! Request:
//!     → handlers.rs (demo page or controller)
//!     → security::ReturnTo on sign-out and completed sign-in
//! ```

pub mod handlers;
pub mod host;
pub mod server;

pub use host::{endpoint, AxumHost, Endpoint, HandlerTable, RouteBinding};
pub use server::{build_router, HttpServer};
