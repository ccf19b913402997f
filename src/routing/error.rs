//! Build-time routing errors.
//!
//! Every variant here is a programmer-configuration mistake caught while the
//! router is being assembled. None of them can occur at request time.

use thiserror::Error;

use crate::routing::kind::RouteKind;

/// Errors raised while resolving or registering authentication routes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// A required option was supplied neither by the directive nor by the
    /// router defaults.
    #[error("{kind} route is missing required option `{option}`")]
    MissingRequiredOption {
        kind: RouteKind,
        option: &'static str,
    },

    /// A strategy advertised a phase it has no HTTP method for.
    #[error("strategy `{strategy}` declares no HTTP method for phase `{phase}`")]
    UnknownStrategyPhase { strategy: String, phase: String },

    /// The strategy introspection has never heard of this resource.
    #[error("unknown resource `{0}`")]
    UnknownResource(String),

    /// Two declarations under one router produced the same route name.
    #[error("route name `{0}` is already declared")]
    DuplicateRouteName(String),

    /// The host router has no handler registered under this reference.
    #[error("no handler registered for `{0}`")]
    UnregisteredHandler(String),

    /// The host already serves this method on this path.
    #[error("{method} {path} is already registered")]
    RouteConflict { method: String, path: String },
}
