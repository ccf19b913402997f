//! Option resolution for route declarations.
//!
//! # Responsibilities
//! - Merge call-site directives with router defaults into one record per route
//! - Resolve every path through the enclosing scope
//! - Compose mount hooks and build the session map for rendered pages
//! - Pass unrecognized directives through as scope options
//!
//! # Design Decisions
//! - Precedence is always directive > router default > hard default, see [`layered`]
//! - Pure: inputs are borrowed and never modified
//! - Missing controllers, resources and strategies fail the build

use std::collections::BTreeMap;

use crate::config::schema::RouterDefaults;
use crate::routing::directives::Directives;
use crate::routing::error::RouteError;
use crate::routing::hooks::{self, Hook};
use crate::routing::ids::{HandlerRef, ResourceId};
use crate::routing::kind::RouteKind;
use crate::routing::path::{join_segments, resolve_path, PathValue, ScopePath};
use crate::routing::session::{self, SessionFields, SessionParams};
use crate::routing::strategy::HttpMethod;
use crate::routing::translation::{TranslationGenerator, Translator};

/// As-name used when neither the directive nor the router names the route.
pub const DEFAULT_AS_NAME: &str = "auth";

/// The built-in UI override set.
pub const DEFAULT_OVERRIDE: &str = "auth_routes::overrides::default";

/// Route parameter carrying a token in reset, confirm and magic-link paths.
pub const TOKEN_SEGMENT: &str = "{token}";

/// Built-in views for the rendered route kinds.
pub const DEFAULT_VIEWS: [&str; 4] = ["SignInLive", "ResetLive", "ConfirmLive", "MagicSignInLive"];

fn default_view(kind: RouteKind) -> Option<&'static str> {
    match kind {
        RouteKind::SignIn => Some(DEFAULT_VIEWS[0]),
        RouteKind::Reset => Some(DEFAULT_VIEWS[1]),
        RouteKind::Confirm => Some(DEFAULT_VIEWS[2]),
        RouteKind::MagicSignIn => Some(DEFAULT_VIEWS[3]),
        RouteKind::SignOut | RouteKind::Auth | RouteKind::AuthFor => None,
    }
}

/// Kind-specific resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteExtras {
    None,
    SignIn {
        register_path: Option<String>,
        reset_path: Option<String>,
    },
    Reset {
        token_as_route_param: bool,
    },
    Token {
        resource: ResourceId,
        strategy: String,
        token_as_route_param: bool,
    },
    Resource {
        resource: ResourceId,
    },
}

/// Normalized configuration for one route declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRouteConfig {
    pub kind: RouteKind,
    pub as_name: String,
    /// `{as_name}_{action}`, unique per router.
    pub route_name: String,
    /// Page action the handler mounts with.
    pub action: &'static str,
    pub path: String,
    /// `None` matches every method.
    pub method: Option<HttpMethod>,
    pub handler: HandlerRef,
    /// Options forwarded to the host router's scope registration.
    pub scope_options: BTreeMap<String, serde_json::Value>,
    pub hooks: Vec<Hook>,
    pub layout: Option<String>,
    pub translator: Option<Translator>,
    pub auth_routes_prefix: Option<String>,
    pub session: SessionParams,
    pub extras: RouteExtras,
}

impl ResolvedRouteConfig {
    /// Resource this route serves, if any.
    pub fn resource(&self) -> Option<&ResourceId> {
        match &self.extras {
            RouteExtras::Token { resource, .. } | RouteExtras::Resource { resource } => {
                Some(resource)
            }
            _ => None,
        }
    }

    /// Routes mounted on the same page next to this one.
    ///
    /// A sign-in page is also served at its register and reset paths, with
    /// the `register` and `reset` actions. Absent paths mount nothing.
    pub fn companions(&self) -> Vec<ResolvedRouteConfig> {
        let RouteExtras::SignIn {
            register_path,
            reset_path,
        } = &self.extras
        else {
            return Vec::new();
        };

        [
            (register_path, "register", "register"),
            (reset_path, "reset", "sign_in_reset"),
        ]
        .into_iter()
        .filter_map(|(path, action, suffix)| {
            path.as_ref().map(|path| ResolvedRouteConfig {
                route_name: format!("{}_{suffix}", self.as_name),
                action,
                path: path.clone(),
                ..self.clone()
            })
        })
        .collect()
    }
}

/// The single precedence rule: a directive beats the router default.
///
/// Callers chain a hard default with `unwrap_or_else` where one exists.
pub fn layered<T: Clone>(directive: Option<&T>, router: Option<&T>) -> Option<T> {
    directive.or(router).cloned()
}

/// Resolve one declaration.
pub fn resolve(
    kind: RouteKind,
    directives: &Directives,
    defaults: &RouterDefaults,
    scope: &dyn ScopePath,
    translations: &dyn TranslationGenerator,
) -> Result<ResolvedRouteConfig, RouteError> {
    let missing = |option: &'static str| RouteError::MissingRequiredOption { kind, option };

    let as_name = directives
        .as_name
        .clone()
        .unwrap_or_else(|| DEFAULT_AS_NAME.to_string());

    let default_path = match kind {
        RouteKind::SignIn => &defaults.sign_in_path,
        RouteKind::SignOut => &defaults.sign_out_path,
        RouteKind::Reset => &defaults.reset_path,
        RouteKind::Confirm => &defaults.confirm_path,
        RouteKind::MagicSignIn => &defaults.magic_link_path,
        RouteKind::Auth | RouteKind::AuthFor => &defaults.auth_routes_prefix,
    };
    let base_path = scoped_or_default(directives.path.as_ref(), default_path, scope)
        .ok_or_else(|| missing("path"))?;

    let handler = layered(directives.handler.as_ref(), defaults.handler_for(kind))
        .or_else(|| default_view(kind).map(HandlerRef::new))
        .ok_or_else(|| missing("handler"))?;

    let otp_app = layered(directives.otp_app.as_ref(), defaults.otp_app.as_ref());

    let mut scope_options = directives.scope_options.clone();
    scope_options
        .entry("alias".to_string())
        .or_insert(serde_json::Value::Bool(false));

    let token_as_route_param = directives.token_as_route_param.unwrap_or(true);
    let with_token = |path: String| {
        if token_as_route_param {
            join_segments([path.as_str(), TOKEN_SEGMENT])
        } else {
            path
        }
    };

    let extras = match kind {
        RouteKind::SignIn => RouteExtras::SignIn {
            register_path: scoped_or_default(
                directives.register_path.as_ref(),
                &defaults.register_path,
                scope,
            ),
            reset_path: scoped_or_default(
                directives.reset_path.as_ref(),
                &defaults.sign_in_reset_path,
                scope,
            ),
        },
        RouteKind::Reset => RouteExtras::Reset {
            token_as_route_param,
        },
        RouteKind::Confirm | RouteKind::MagicSignIn => RouteExtras::Token {
            resource: directives.resource.clone().ok_or_else(|| missing("resource"))?,
            strategy: directives.strategy.clone().ok_or_else(|| missing("strategy"))?,
            token_as_route_param,
        },
        RouteKind::Auth | RouteKind::AuthFor => RouteExtras::Resource {
            resource: directives.resource.clone().ok_or_else(|| missing("resource"))?,
        },
        RouteKind::SignOut => RouteExtras::None,
    };

    let path = match kind {
        RouteKind::Reset | RouteKind::Confirm | RouteKind::MagicSignIn => with_token(base_path),
        _ => base_path,
    };

    if !kind.is_view() {
        let resource = match &extras {
            RouteExtras::Resource { resource } => Some(resource),
            _ => None,
        };
        let session = session::assemble(&SessionFields {
            otp_app: otp_app.as_deref(),
            resource,
            ..SessionFields::default()
        });

        tracing::debug!(kind = %kind, path = %path, handler = %handler, "Resolved controller route");

        return Ok(ResolvedRouteConfig {
            kind,
            route_name: format!("{as_name}_{}", kind.action()),
            action: kind.action(),
            as_name,
            path,
            method: (kind == RouteKind::SignOut).then_some(HttpMethod::Get),
            handler,
            scope_options,
            hooks: Vec::new(),
            layout: None,
            translator: None,
            auth_routes_prefix: None,
            session,
            extras,
        });
    }

    let hooks = hooks::compose(
        layered(
            directives.on_mount_prepend.as_ref(),
            Some(&defaults.on_mount_prepend),
        )
        .as_deref(),
        layered(directives.on_mount.as_ref(), Some(&defaults.on_mount)).as_deref(),
    );

    let layout = layered(directives.layout.as_ref(), defaults.layout.as_ref());

    let translator = directives.gettext_fn.clone().or_else(|| {
        layered(
            directives.gettext_backend.as_ref(),
            defaults.gettext_backend.as_ref(),
        )
        .map(|backend| translations.generate(&backend))
    });

    let overrides = directives
        .overrides
        .clone()
        .unwrap_or_else(|| vec![DEFAULT_OVERRIDE.to_string()]);

    let auth_routes_prefix = scoped_or_default(
        directives.auth_routes_prefix.as_ref(),
        &defaults.auth_routes_prefix,
        scope,
    );

    let mut fields = SessionFields {
        auth_routes_prefix: auth_routes_prefix.as_deref(),
        overrides: Some(overrides.as_slice()),
        translator: translator.as_ref(),
        otp_app: otp_app.as_deref(),
        ..SessionFields::default()
    };
    match &extras {
        RouteExtras::SignIn {
            register_path,
            reset_path,
        } => {
            fields.path = Some(path.as_str());
            fields.register_path = register_path.as_deref();
            fields.reset_path = reset_path.as_deref();
            fields.context = directives.context.as_ref();
        }
        RouteExtras::Token {
            resource, strategy, ..
        } => {
            fields.resource = Some(resource);
            fields.strategy = Some(strategy.as_str());
        }
        _ => {}
    }
    let session = session::assemble(&fields);

    tracing::debug!(
        kind = %kind,
        path = %path,
        handler = %handler,
        hooks = hooks.len(),
        "Resolved view route"
    );

    Ok(ResolvedRouteConfig {
        kind,
        route_name: format!("{as_name}_{}", kind.action()),
        action: kind.action(),
        as_name,
        path,
        method: Some(HttpMethod::Get),
        handler,
        scope_options,
        hooks,
        layout,
        translator,
        auth_routes_prefix,
        session,
        extras,
    })
}

// A directive path wins; otherwise the router default, which is always scoped.
fn scoped_or_default(
    directive: Option<&PathValue>,
    router_default: &str,
    scope: &dyn ScopePath,
) -> Option<String> {
    let fallback = PathValue::scoped(router_default);
    resolve_path(directive.unwrap_or(&fallback), scope)
}
