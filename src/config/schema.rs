//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the auth
//! route layer and the demo host. All types derive Serde traits for
//! deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::catalog::ResourceConfig;
use crate::routing::directives::Directives;
use crate::routing::hooks::Hook;
use crate::routing::ids::HandlerRef;
use crate::routing::kind::RouteKind;
use crate::routing::translation::TranslationBackend;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration for the demo host.
    pub listener: ListenerConfig,

    /// Router-level defaults shared by every route declaration.
    pub router: RouterDefaults,

    /// Authenticated resources and their strategies.
    pub resources: Vec<ResourceConfig>,

    /// Route declarations, registered in order.
    pub routes: Vec<RouteDeclaration>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:4000".to_string(),
        }
    }
}

/// Router-level defaults.
///
/// Established once when the router is built and read by every declaration.
/// Path values here are scoped: they inherit the enclosing mount prefix.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterDefaults {
    /// Router identity, used in logs.
    pub router: String,

    pub sign_in_path: String,
    pub sign_out_path: String,
    pub reset_path: String,

    /// Registration link rendered on the sign-in page.
    pub register_path: String,

    /// Password reset link rendered on the sign-in page.
    pub sign_in_reset_path: String,

    /// Prefix of confirmation routes.
    pub confirm_path: String,

    /// Prefix of magic-link sign-in routes.
    pub magic_link_path: String,

    /// Where strategy routes are mounted.
    pub auth_routes_prefix: String,

    /// Query parameter carrying the post-authentication redirect target.
    pub redirect_param: String,

    /// Default auth scope (application identifier) handed to rendered pages.
    pub otp_app: Option<String>,

    pub layout: Option<String>,

    pub gettext_backend: Option<TranslationBackend>,

    /// Hooks run after the mandatory session hooks.
    pub on_mount: Vec<Hook>,

    /// Hooks run before the mandatory session hooks.
    pub on_mount_prepend: Vec<Hook>,

    pub handlers: HandlerDefaults,

    pub redirect: RedirectConfig,
}

impl Default for RouterDefaults {
    fn default() -> Self {
        Self {
            router: "default".to_string(),
            sign_in_path: "/sign-in".to_string(),
            sign_out_path: "/sign-out".to_string(),
            reset_path: "/password-reset".to_string(),
            register_path: "/register".to_string(),
            sign_in_reset_path: "/reset".to_string(),
            confirm_path: "/confirm".to_string(),
            magic_link_path: "/magic_link".to_string(),
            auth_routes_prefix: "/auth".to_string(),
            redirect_param: "next".to_string(),
            otp_app: None,
            layout: None,
            gettext_backend: None,
            on_mount: Vec::new(),
            on_mount_prepend: Vec::new(),
            handlers: HandlerDefaults::default(),
            redirect: RedirectConfig::default(),
        }
    }
}

impl RouterDefaults {
    /// Default handler for a route kind.
    pub fn handler_for(&self, kind: RouteKind) -> Option<&HandlerRef> {
        match kind {
            RouteKind::SignIn => self.handlers.sign_in.as_ref(),
            RouteKind::SignOut => self.handlers.sign_out.as_ref(),
            RouteKind::Reset => self.handlers.reset.as_ref(),
            RouteKind::Confirm => self.handlers.confirm.as_ref(),
            RouteKind::MagicSignIn => self.handlers.magic_sign_in.as_ref(),
            RouteKind::Auth | RouteKind::AuthFor => self.handlers.auth.as_ref(),
        }
    }
}

/// Default handler references per route kind.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HandlerDefaults {
    pub sign_in: Option<HandlerRef>,
    pub sign_out: Option<HandlerRef>,
    pub reset: Option<HandlerRef>,
    pub confirm: Option<HandlerRef>,
    pub magic_sign_in: Option<HandlerRef>,
    /// Controller for strategy routes, forwarded or explicit.
    pub auth: Option<HandlerRef>,
}

/// Redirect target policy. Lists extend the built-in sets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Target used whenever a candidate is rejected.
    pub fallback: String,

    /// Exact paths never redirected to.
    pub unsafe_paths: Vec<String>,

    /// Additional allowed schemes.
    pub safe_schemes: Vec<String>,

    /// Additional allowed hosts.
    pub safe_hosts: Vec<String>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            fallback: "/".to_string(),
            unsafe_paths: Vec::new(),
            safe_schemes: Vec::new(),
            safe_hosts: Vec::new(),
        }
    }
}

/// A route declaration from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDeclaration {
    pub kind: RouteKind,

    /// Mount prefix the declaration is nested under.
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(flatten)]
    pub directives: Directives,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
