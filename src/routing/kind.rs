//! Route declaration categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The category of a route declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    SignIn,
    SignOut,
    Reset,
    Confirm,
    MagicSignIn,
    /// Dynamic catch-all forward handled by a dispatcher.
    Auth,
    /// Explicit per-resource strategy routes.
    AuthFor,
}

impl RouteKind {
    /// Action name used when building route names.
    pub fn action(self) -> &'static str {
        match self {
            RouteKind::SignIn => "sign_in",
            RouteKind::SignOut => "sign_out",
            RouteKind::Reset => "reset",
            RouteKind::Confirm => "confirm",
            RouteKind::MagicSignIn => "magic_sign_in",
            RouteKind::Auth => "auth",
            RouteKind::AuthFor => "auth_for",
        }
    }

    /// View kinds are rendered UI pages: they get hooks, a layout and a
    /// session map. The rest are plain controller routes.
    pub fn is_view(self) -> bool {
        matches!(
            self,
            RouteKind::SignIn | RouteKind::Reset | RouteKind::Confirm | RouteKind::MagicSignIn
        )
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}
