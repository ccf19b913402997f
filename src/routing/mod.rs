//! Authentication route composition.
//!
//! # Data Flow
//! ```text
//! Router build (once, at startup):
//!     RouterDefaults + Directives per declaration
//!     → options.rs (precedence merge)
//!         → path.rs (scope prefixes)
//!         → hooks.rs (mount hooks)
//!         → session.rs (mount-time parameters)
//!     → strategy.rs (AuthFor only: one tuple per strategy phase)
//!     → registrar.rs (name check, host registration)
//!     → HostRouter (RouteTable, AxumHost)
//! ```
//!
//! # Design Decisions
//! - Everything here runs at build time and is synchronous
//! - Configuration mistakes are errors, never silently ignored
//! - Host routers and strategy lookups sit behind traits
//! - No dependency on a particular HTTP framework

pub mod catalog;
pub mod directives;
pub mod error;
pub mod hooks;
pub mod ids;
pub mod kind;
pub mod options;
pub mod path;
pub mod registrar;
pub mod session;
pub mod strategy;
pub mod table;
pub mod translation;

pub use catalog::{CatalogDispatcher, ResourceCatalog};
pub use directives::Directives;
pub use error::RouteError;
pub use hooks::Hook;
pub use ids::{HandlerRef, ResourceId};
pub use kind::RouteKind;
pub use options::ResolvedRouteConfig;
pub use path::{MountScope, PathValue};
pub use registrar::{HostRouter, RouteRegistrar};
pub use table::RouteTable;
