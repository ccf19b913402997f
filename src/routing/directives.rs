//! Call-site directives for a route declaration.
//!
//! Every recognized option is a named optional field: `None` means "not
//! supplied here, fall back to the router default". Keys the route layer does
//! not recognize are kept in `scope_options` and forwarded to the host
//! router's scope registration untouched.
//!
//! Directives can be built in code:
//!
//! ```
//! use auth_routes::routing::{Directives, PathValue};
//!
//! let directives = Directives::new()
//!     .as_name("account")
//!     .path(PathValue::scoped("/login"))
//!     .scope_option("host", "accounts.");
//! ```
//!
//! or deserialized from a TOML table with the same key names.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::routing::hooks::Hook;
use crate::routing::ids::{HandlerRef, ResourceId};
use crate::routing::path::PathValue;
use crate::routing::translation::{TranslationBackend, Translator};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Directives {
    #[serde(rename = "as")]
    pub(crate) as_name: Option<String>,
    pub(crate) path: Option<PathValue>,
    pub(crate) otp_app: Option<String>,
    pub(crate) layout: Option<String>,
    pub(crate) on_mount: Option<Vec<Hook>>,
    pub(crate) on_mount_prepend: Option<Vec<Hook>>,
    pub(crate) auth_routes_prefix: Option<PathValue>,
    #[serde(skip)]
    pub(crate) gettext_fn: Option<Translator>,
    pub(crate) gettext_backend: Option<TranslationBackend>,
    pub(crate) overrides: Option<Vec<String>>,
    pub(crate) handler: Option<HandlerRef>,
    pub(crate) context: Option<serde_json::Map<String, serde_json::Value>>,
    pub(crate) register_path: Option<PathValue>,
    pub(crate) reset_path: Option<PathValue>,
    pub(crate) token_as_route_param: Option<bool>,
    pub(crate) resource: Option<ResourceId>,
    pub(crate) strategy: Option<String>,
    #[serde(flatten)]
    pub(crate) scope_options: BTreeMap<String, serde_json::Value>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_name(mut self, name: impl Into<String>) -> Self {
        self.as_name = Some(name.into());
        self
    }

    pub fn path(mut self, path: PathValue) -> Self {
        self.path = Some(path);
        self
    }

    pub fn otp_app(mut self, otp_app: impl Into<String>) -> Self {
        self.otp_app = Some(otp_app.into());
        self
    }

    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Hooks run after the mandatory session hooks.
    pub fn on_mount(mut self, hooks: Vec<Hook>) -> Self {
        self.on_mount = Some(hooks);
        self
    }

    /// Hooks run before the mandatory session hooks.
    pub fn on_mount_prepend(mut self, hooks: Vec<Hook>) -> Self {
        self.on_mount_prepend = Some(hooks);
        self
    }

    pub fn auth_routes_prefix(mut self, prefix: PathValue) -> Self {
        self.auth_routes_prefix = Some(prefix);
        self
    }

    /// A ready translation function. Takes precedence over any backend.
    pub fn gettext_fn(mut self, translator: Translator) -> Self {
        self.gettext_fn = Some(translator);
        self
    }

    pub fn gettext_backend(mut self, backend: TranslationBackend) -> Self {
        self.gettext_backend = Some(backend);
        self
    }

    pub fn overrides(mut self, overrides: Vec<String>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// View or controller serving the route.
    pub fn handler(mut self, handler: impl Into<HandlerRef>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn context(mut self, context: serde_json::Map<String, serde_json::Value>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn register_path(mut self, path: PathValue) -> Self {
        self.register_path = Some(path);
        self
    }

    pub fn reset_path(mut self, path: PathValue) -> Self {
        self.reset_path = Some(path);
        self
    }

    pub fn token_as_route_param(mut self, enabled: bool) -> Self {
        self.token_as_route_param = Some(enabled);
        self
    }

    pub fn resource(mut self, resource: impl Into<ResourceId>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Any other option, forwarded to the host router's scope as-is.
    pub fn scope_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.scope_options.insert(key.into(), value.into());
        self
    }
}
