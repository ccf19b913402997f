//! Route registration.
//!
//! # Responsibilities
//! - Sequence option resolution and strategy enumeration per declaration
//! - Reject duplicate route names under one router
//! - Hand each resolved route, tuple or forward to the host router
//!
//! # Design Decisions
//! - The host is a trait so the same declarations can be recorded or served
//! - Scopes nest through a closure and are restored on exit, even on error
//! - Registration stops at the first error; the build is aborted by the caller

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::schema::{AppConfig, RouteDeclaration, RouterDefaults};
use crate::observability::metrics;
use crate::routing::catalog::{CatalogDispatcher, ResourceCatalog};
use crate::routing::directives::Directives;
use crate::routing::error::RouteError;
use crate::routing::ids::{HandlerRef, ResourceId};
use crate::routing::kind::RouteKind;
use crate::routing::options::{self, ResolvedRouteConfig};
use crate::routing::path::MountScope;
use crate::routing::strategy::{self, RouteTuple, StrategyDispatcher, StrategyIntrospection};
use crate::routing::translation::{InterpolatingTranslations, TranslationGenerator};

/// Controller serving strategy routes when the router names none.
pub const DEFAULT_CONTROLLER: &str = "AuthController";

/// Registration primitives of a host router.
pub trait HostRouter {
    /// A rendered page or a plain controller route.
    fn register_route(&mut self, route: &ResolvedRouteConfig) -> Result<(), RouteError>;

    /// One explicit per-resource strategy route.
    fn register_tuple(
        &mut self,
        name: &str,
        route: &ResolvedRouteConfig,
        tuple: &RouteTuple,
    ) -> Result<(), RouteError>;

    /// A catch-all forward under `route.path`, dispatched at request time.
    fn register_forward(
        &mut self,
        route: &ResolvedRouteConfig,
        dispatcher: Arc<dyn StrategyDispatcher>,
    ) -> Result<(), RouteError>;
}

impl<H: HostRouter + ?Sized> HostRouter for &mut H {
    fn register_route(&mut self, route: &ResolvedRouteConfig) -> Result<(), RouteError> {
        (**self).register_route(route)
    }

    fn register_tuple(
        &mut self,
        name: &str,
        route: &ResolvedRouteConfig,
        tuple: &RouteTuple,
    ) -> Result<(), RouteError> {
        (**self).register_tuple(name, route, tuple)
    }

    fn register_forward(
        &mut self,
        route: &ResolvedRouteConfig,
        dispatcher: Arc<dyn StrategyDispatcher>,
    ) -> Result<(), RouteError> {
        (**self).register_forward(route, dispatcher)
    }
}

/// Declares authentication routes onto a host router.
pub struct RouteRegistrar<'a, H> {
    defaults: &'a RouterDefaults,
    host: H,
    scope: MountScope,
    translations: &'a dyn TranslationGenerator,
    introspection: Option<&'a dyn StrategyIntrospection>,
    dispatcher: Option<Arc<dyn StrategyDispatcher>>,
    names: HashSet<String>,
}

impl<'a, H: HostRouter> RouteRegistrar<'a, H> {
    pub fn new(defaults: &'a RouterDefaults, host: H) -> Self {
        Self {
            defaults,
            host,
            scope: MountScope::root(),
            translations: &InterpolatingTranslations,
            introspection: None,
            dispatcher: None,
            names: HashSet::new(),
        }
    }

    pub fn with_translations(mut self, translations: &'a dyn TranslationGenerator) -> Self {
        self.translations = translations;
        self
    }

    /// Strategy lookup used by `auth_routes_for`.
    pub fn with_introspection(mut self, introspection: &'a dyn StrategyIntrospection) -> Self {
        self.introspection = Some(introspection);
        self
    }

    /// Dispatcher handed to every `auth_routes` forward.
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn StrategyDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn scope_prefix(&self) -> String {
        self.scope.prefix()
    }

    /// Resolve one declaration and register the result.
    pub fn declare(
        &mut self,
        kind: RouteKind,
        directives: &Directives,
    ) -> Result<&mut Self, RouteError> {
        let route = options::resolve(
            kind,
            directives,
            self.defaults,
            &self.scope,
            self.translations,
        )?;

        match kind {
            RouteKind::AuthFor => self.register_strategy_routes(&route)?,
            RouteKind::Auth => {
                let dispatcher = self.dispatcher.clone().ok_or(
                    RouteError::MissingRequiredOption {
                        kind,
                        option: "dispatcher",
                    },
                )?;
                self.claim(&route.route_name)?;
                self.host.register_forward(&route, dispatcher)?;
                self.registered(&route.route_name, &route);
            }
            _ => {
                let companions = route.companions();
                let mut routes = vec![route];
                routes.extend(companions);

                let names: Vec<&str> = routes.iter().map(|r| r.route_name.as_str()).collect();
                self.claim_all(&names)?;

                for route in &routes {
                    self.host.register_route(route)?;
                    self.registered(&route.route_name, route);
                }
            }
        }

        Ok(self)
    }

    pub fn sign_in_route(&mut self, directives: Directives) -> Result<&mut Self, RouteError> {
        self.declare(RouteKind::SignIn, &directives)
    }

    pub fn sign_out_route(
        &mut self,
        handler: impl Into<HandlerRef>,
        directives: Directives,
    ) -> Result<&mut Self, RouteError> {
        self.declare(RouteKind::SignOut, &directives.handler(handler))
    }

    pub fn reset_route(&mut self, directives: Directives) -> Result<&mut Self, RouteError> {
        self.declare(RouteKind::Reset, &directives)
    }

    pub fn confirm_route(
        &mut self,
        resource: impl Into<ResourceId>,
        strategy: impl Into<String>,
        directives: Directives,
    ) -> Result<&mut Self, RouteError> {
        self.declare(
            RouteKind::Confirm,
            &directives.resource(resource).strategy(strategy),
        )
    }

    pub fn magic_sign_in_route(
        &mut self,
        resource: impl Into<ResourceId>,
        strategy: impl Into<String>,
        directives: Directives,
    ) -> Result<&mut Self, RouteError> {
        self.declare(
            RouteKind::MagicSignIn,
            &directives.resource(resource).strategy(strategy),
        )
    }

    /// Catch-all forward for a resource's strategies.
    pub fn auth_routes(
        &mut self,
        handler: impl Into<HandlerRef>,
        resource: impl Into<ResourceId>,
        directives: Directives,
    ) -> Result<&mut Self, RouteError> {
        self.declare(
            RouteKind::Auth,
            &directives.handler(handler).resource(resource),
        )
    }

    /// One explicit route per strategy phase of a resource.
    pub fn auth_routes_for(
        &mut self,
        handler: impl Into<HandlerRef>,
        resource: impl Into<ResourceId>,
        directives: Directives,
    ) -> Result<&mut Self, RouteError> {
        self.declare(
            RouteKind::AuthFor,
            &directives.handler(handler).resource(resource),
        )
    }

    /// Run `declare` with `prefix` pushed onto the mount scope.
    pub fn scope<F>(&mut self, prefix: &str, declare: F) -> Result<&mut Self, RouteError>
    where
        F: FnOnce(&mut Self) -> Result<(), RouteError>,
    {
        let nested = self.scope.nest(prefix);
        let outer = std::mem::replace(&mut self.scope, nested);
        let result = declare(self);
        self.scope = outer;
        result.map(|()| self)
    }

    /// Register declarations from configuration, in order.
    pub fn declare_all(
        &mut self,
        declarations: &[RouteDeclaration],
    ) -> Result<&mut Self, RouteError> {
        for declaration in declarations {
            match &declaration.scope {
                Some(prefix) => {
                    self.scope(prefix, |r| {
                        r.declare(declaration.kind, &declaration.directives)
                            .map(|_| ())
                    })?;
                }
                None => {
                    self.declare(declaration.kind, &declaration.directives)?;
                }
            }
        }
        Ok(self)
    }

    /// Hand back the host router.
    pub fn finish(self) -> H {
        tracing::info!(
            router = %self.defaults.router,
            routes = self.names.len(),
            "Auth routes registered"
        );
        self.host
    }

    fn register_strategy_routes(&mut self, route: &ResolvedRouteConfig) -> Result<(), RouteError> {
        let missing = |option| RouteError::MissingRequiredOption {
            kind: RouteKind::AuthFor,
            option,
        };
        let introspection = self.introspection.ok_or_else(|| missing("introspection"))?;
        let resource = route.resource().ok_or_else(|| missing("resource"))?;

        let tuples = strategy::enumerate(introspection, resource, Some(&route.handler), &route.path)?;

        let names: Vec<String> = tuples
            .iter()
            .map(|tuple| {
                format!(
                    "{}_{}_{}_{}",
                    route.as_name,
                    tuple.action.subject_name,
                    tuple.action.strategy_name,
                    tuple.action.phase
                )
            })
            .collect();

        let borrowed: Vec<&str> = names.iter().map(String::as_str).collect();
        self.claim_all(&borrowed)?;

        for (name, tuple) in names.iter().zip(&tuples) {
            self.host.register_tuple(name, route, tuple)?;
            tracing::debug!(
                route = %name,
                method = %tuple.method,
                path = %tuple.path,
                "Registered strategy route"
            );
            metrics::record_route_registered(RouteKind::AuthFor.action());
        }

        Ok(())
    }

    fn claim(&mut self, name: &str) -> Result<(), RouteError> {
        self.claim_all(&[name])
    }

    // Every name is checked before any is taken, so a clash registers nothing.
    fn claim_all(&mut self, names: &[&str]) -> Result<(), RouteError> {
        let mut fresh = HashSet::new();
        for name in names {
            if self.names.contains(*name) || !fresh.insert(*name) {
                return Err(RouteError::DuplicateRouteName(name.to_string()));
            }
        }
        self.names.extend(names.iter().map(|name| name.to_string()));
        Ok(())
    }

    fn registered(&self, name: &str, route: &ResolvedRouteConfig) {
        tracing::debug!(
            route = %name,
            kind = %route.kind,
            path = %route.path,
            "Registered auth route"
        );
        metrics::record_route_registered(route.kind.action());
    }
}

/// Register every declaration of `config` onto `host`.
///
/// Strategies come from the configured resources; forwards are dispatched
/// over the same catalog to the router's auth controller.
pub fn register_config<H: HostRouter>(config: &AppConfig, host: H) -> Result<H, RouteError> {
    let defaults = &config.router;
    let catalog = Arc::new(ResourceCatalog::from_config(&config.resources));
    let controller = defaults
        .handlers
        .auth
        .clone()
        .unwrap_or_else(|| HandlerRef::new(DEFAULT_CONTROLLER));
    let dispatcher = Arc::new(CatalogDispatcher::new(Arc::clone(&catalog), controller));

    let mut registrar = RouteRegistrar::new(defaults, host)
        .with_introspection(catalog.as_ref())
        .with_dispatcher(dispatcher);
    registrar.declare_all(&config.routes)?;

    Ok(registrar.finish())
}
