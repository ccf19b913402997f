//! Mount lifecycle hooks.
//!
//! Every rendered auth page runs the session loader and the session guard.
//! Callers may add hooks before (`on_mount_prepend`) and after (`on_mount`)
//! them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Loads the current session into the mount context.
pub const SESSION_LOADER: &str = "auth_routes::load_session";

/// Enforces the authentication state expected by the page.
pub const SESSION_GUARD: &str = "auth_routes::guard_session";

/// A lifecycle hook, optionally paired with an argument.
///
/// Identity is the hook id alone: `load_session` and
/// `{ hook = "load_session", arg = "admin" }` are the same hook.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "HookRepr", into = "HookRepr")]
pub struct Hook {
    id: String,
    arg: Option<serde_json::Value>,
}

impl Hook {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arg: None,
        }
    }

    pub fn with_arg(id: impl Into<String>, arg: impl Into<serde_json::Value>) -> Self {
        Self {
            id: id.into(),
            arg: Some(arg.into()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn arg(&self) -> Option<&serde_json::Value> {
        self.arg.as_ref()
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum HookRepr {
    Bare(String),
    Pair {
        hook: String,
        arg: serde_json::Value,
    },
}

impl From<HookRepr> for Hook {
    fn from(repr: HookRepr) -> Self {
        match repr {
            HookRepr::Bare(id) => Hook::new(id),
            HookRepr::Pair { hook, arg } => Hook::with_arg(hook, arg),
        }
    }
}

impl From<Hook> for HookRepr {
    fn from(hook: Hook) -> Self {
        match hook.arg {
            None => HookRepr::Bare(hook.id),
            Some(arg) => HookRepr::Pair { hook: hook.id, arg },
        }
    }
}

/// Build the ordered hook list for a rendered route.
///
/// Order is `prepend`, then the two mandatory hooks, then `append`. Later
/// duplicates (by id) are dropped.
pub fn compose(prepend: Option<&[Hook]>, append: Option<&[Hook]>) -> Vec<Hook> {
    let mandatory = [Hook::new(SESSION_LOADER), Hook::new(SESSION_GUARD)];

    let mut seen = HashSet::new();
    prepend
        .unwrap_or_default()
        .iter()
        .chain(mandatory.iter())
        .chain(append.unwrap_or_default())
        .filter(|hook| seen.insert(hook.id.clone()))
        .cloned()
        .collect()
}
