//! Axum host router.
//!
//! # Responsibilities
//! - Turn registrations into `axum` routes backed by a handler table
//! - Merge several methods registered on one path
//! - Report overlapping registrations instead of panicking
//!
//! # Design Decisions
//! - Endpoints are looked up by [`HandlerRef`] at registration time, so an
//!   unknown handler fails the build rather than the request
//! - Each endpoint receives the [`RouteBinding`] it was registered with
//! - Forwards cover both `{prefix}` and `{prefix}/{*rest}`

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::{any, MethodFilter, MethodRouter};
use axum::Router;

use crate::routing::error::RouteError;
use crate::routing::ids::HandlerRef;
use crate::routing::options::ResolvedRouteConfig;
use crate::routing::registrar::HostRouter;
use crate::routing::strategy::{HttpMethod, RouteTuple, StrategyDispatcher};

type BoxResponse = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A request handler bound to a registration.
pub type Endpoint = Arc<dyn Fn(Arc<RouteBinding>, Request<Body>) -> BoxResponse + Send + Sync>;

/// Wrap an async function as an [`Endpoint`].
pub fn endpoint<F, Fut>(f: F) -> Endpoint
where
    F: Fn(Arc<RouteBinding>, Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |binding, request| Box::pin(f(binding, request)))
}

/// What an endpoint was registered for.
pub enum RouteBinding {
    Route(ResolvedRouteConfig),
    Tuple {
        name: String,
        route: ResolvedRouteConfig,
        tuple: RouteTuple,
    },
    Forward {
        route: ResolvedRouteConfig,
        dispatcher: Arc<dyn StrategyDispatcher>,
    },
}

impl RouteBinding {
    /// The declaration this binding came from.
    pub fn route(&self) -> &ResolvedRouteConfig {
        match self {
            RouteBinding::Route(route)
            | RouteBinding::Tuple { route, .. }
            | RouteBinding::Forward { route, .. } => route,
        }
    }
}

/// Endpoints by handler reference.
#[derive(Clone, Default)]
pub struct HandlerTable {
    endpoints: HashMap<HandlerRef, Endpoint>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, handler: impl Into<HandlerRef>, endpoint: Endpoint) -> Self {
        self.endpoints.insert(handler.into(), endpoint);
        self
    }

    pub fn get(&self, handler: &HandlerRef) -> Option<&Endpoint> {
        self.endpoints.get(handler)
    }
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

/// Host router building an [`axum::Router`].
pub struct AxumHost {
    handlers: HandlerTable,
    routes: BTreeMap<String, MethodRouter>,
    // `None` stands for "every method".
    claimed: HashMap<String, Vec<Option<HttpMethod>>>,
}

impl AxumHost {
    pub fn new(handlers: HandlerTable) -> Self {
        Self {
            handlers,
            routes: BTreeMap::new(),
            claimed: HashMap::new(),
        }
    }

    /// Registered `(path, methods)` pairs, sorted by path.
    pub fn paths(&self) -> Vec<(&str, &[Option<HttpMethod>])> {
        let mut paths: Vec<_> = self
            .claimed
            .iter()
            .map(|(path, methods)| (path.as_str(), methods.as_slice()))
            .collect();
        paths.sort_by_key(|(path, _)| *path);
        paths
    }

    pub fn into_router(self) -> Router {
        self.routes
            .into_iter()
            .fold(Router::new(), |router, (path, methods)| {
                router.route(&path, methods)
            })
    }

    fn add(
        &mut self,
        path: &str,
        method: Option<HttpMethod>,
        handler: &HandlerRef,
        binding: Arc<RouteBinding>,
    ) -> Result<(), RouteError> {
        let endpoint = self
            .handlers
            .get(handler)
            .cloned()
            .ok_or_else(|| RouteError::UnregisteredHandler(handler.to_string()))?;

        self.claim(path, method)?;

        let service = move |request: Request<Body>| endpoint(Arc::clone(&binding), request);

        let methods = match method {
            Some(method) => self
                .routes
                .remove(path)
                .unwrap_or_default()
                .on(method_filter(method), service),
            None => any(service),
        };
        self.routes.insert(path.to_string(), methods);

        tracing::debug!(
            path = %path,
            method = method.map_or("*", HttpMethod::as_str),
            handler = %handler,
            "Mounted endpoint"
        );
        Ok(())
    }

    fn claim(&mut self, path: &str, method: Option<HttpMethod>) -> Result<(), RouteError> {
        let methods = self.claimed.entry(path.to_string()).or_default();
        let overlaps = methods
            .iter()
            .any(|m| m.is_none() || method.is_none() || *m == method);

        if overlaps {
            return Err(RouteError::RouteConflict {
                method: method.map_or("*", HttpMethod::as_str).to_string(),
                path: path.to_string(),
            });
        }

        methods.push(method);
        Ok(())
    }
}

impl HostRouter for AxumHost {
    fn register_route(&mut self, route: &ResolvedRouteConfig) -> Result<(), RouteError> {
        let binding = Arc::new(RouteBinding::Route(route.clone()));
        self.add(&route.path, route.method, &route.handler, binding)
    }

    fn register_tuple(
        &mut self,
        name: &str,
        route: &ResolvedRouteConfig,
        tuple: &RouteTuple,
    ) -> Result<(), RouteError> {
        let binding = Arc::new(RouteBinding::Tuple {
            name: name.to_string(),
            route: route.clone(),
            tuple: tuple.clone(),
        });
        self.add(&tuple.path, Some(tuple.method), &tuple.controller, binding)
    }

    fn register_forward(
        &mut self,
        route: &ResolvedRouteConfig,
        dispatcher: Arc<dyn StrategyDispatcher>,
    ) -> Result<(), RouteError> {
        let binding = Arc::new(RouteBinding::Forward {
            route: route.clone(),
            dispatcher,
        });
        let nested = format!("{}/{{*rest}}", route.path.trim_end_matches('/'));

        self.add(&route.path, None, &route.handler, Arc::clone(&binding))?;
        self.add(&nested, None, &route.handler, binding)
    }
}
