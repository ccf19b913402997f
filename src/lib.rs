//! Authentication route composition.
//!
//! Resolves declarative sign-in, sign-out, reset, confirmation, magic-link and
//! per-resource strategy route declarations into concrete routes, and guards
//! every post-authentication redirect against open redirects.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use routing::{Directives, RouteError, RouteRegistrar};
pub use security::{sanitize, RedirectPolicy, ReturnTo};
