//! Strategy-to-endpoint enumeration.
//!
//! # Responsibilities
//! - Ask the introspection collaborator for a resource's strategies
//! - Expand every (strategy, phase) into a concrete route tuple
//! - Fail the build on missing controllers or phases without a method
//!
//! # Design Decisions
//! - Add-on strategies are emitted before primary strategies
//! - The phase→method policy belongs to the strategy, not to this module
//! - Nothing is emitted unless every tuple can be built

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::error::RouteError;
use crate::routing::ids::{HandlerRef, ResourceId};
use crate::routing::kind::RouteKind;
use crate::routing::path::join_segments;

/// HTTP methods a strategy phase may be served on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[serde(alias = "GET")]
    Get,
    #[serde(alias = "POST")]
    Post,
    #[serde(alias = "PUT")]
    Put,
    #[serde(alias = "PATCH")]
    Patch,
    #[serde(alias = "DELETE")]
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One route a strategy exposes: a path template and the phase it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyRoute {
    pub path: String,
    pub phase: String,
}

impl StrategyRoute {
    pub fn new(path: impl Into<String>, phase: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            phase: phase.into(),
        }
    }
}

/// A configured authentication mechanism attached to a resource.
pub trait AuthStrategy: fmt::Debug + Send + Sync {
    /// Strategy name, unique per resource.
    fn name(&self) -> &str;

    /// Routes in declaration order.
    fn routes(&self) -> Vec<StrategyRoute>;

    /// HTTP method for a phase, `None` when the strategy has no mapping.
    fn method_for_phase(&self, phase: &str) -> Option<HttpMethod>;
}

/// Looks up the strategies configured on a resource.
pub trait StrategyIntrospection {
    /// Subject name of the resource, `None` for unknown resources.
    fn subject_name(&self, resource: &ResourceId) -> Option<String>;

    fn add_on_strategies(&self, resource: &ResourceId) -> Vec<Arc<dyn AuthStrategy>>;

    fn strategies(&self, resource: &ResourceId) -> Vec<Arc<dyn AuthStrategy>>;
}

/// Resolves a (resource, strategy, phase) triple to a handler at request
/// time. Only passed through by the route layer.
///
/// `phase_path` is the request path below the strategy root (`""` for the
/// root itself); `method` is the request's method.
pub trait StrategyDispatcher: Send + Sync {
    fn match_phase(
        &self,
        resource: &ResourceId,
        strategy: &str,
        phase_path: &str,
        method: HttpMethod,
    ) -> Option<HandlerRef>;
}

/// What a route tuple does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    pub subject_name: String,
    pub strategy_name: String,
    pub phase: String,
}

/// A concrete per-resource route.
#[derive(Debug, Clone)]
pub struct RouteTuple {
    pub method: HttpMethod,
    pub path: String,
    pub controller: HandlerRef,
    pub action: ActionDescriptor,
    /// Originating strategy, kept for later inspection (e.g. access policies).
    pub strategy: Arc<dyn AuthStrategy>,
}

impl PartialEq for RouteTuple {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.path == other.path
            && self.controller == other.controller
            && self.action == other.action
            && self.strategy.name() == other.strategy.name()
    }
}

/// Expand a resource's strategies into route tuples under `base`.
///
/// Add-on strategies come first, then primary strategies, each in declared
/// order; phases follow the order of the strategy's routes.
pub fn enumerate(
    introspection: &dyn StrategyIntrospection,
    resource: &ResourceId,
    controller: Option<&HandlerRef>,
    base: &str,
) -> Result<Vec<RouteTuple>, RouteError> {
    let controller = controller.ok_or(RouteError::MissingRequiredOption {
        kind: RouteKind::AuthFor,
        option: "handler",
    })?;

    let subject_name = introspection
        .subject_name(resource)
        .ok_or_else(|| RouteError::UnknownResource(resource.to_string()))?;

    let strategies = introspection
        .add_on_strategies(resource)
        .into_iter()
        .chain(introspection.strategies(resource));

    let mut tuples = Vec::new();
    for strategy in strategies {
        for route in strategy.routes() {
            let method = strategy.method_for_phase(&route.phase).ok_or_else(|| {
                RouteError::UnknownStrategyPhase {
                    strategy: strategy.name().to_string(),
                    phase: route.phase.clone(),
                }
            })?;

            tuples.push(RouteTuple {
                method,
                path: join_segments([base, route.path.as_str()]),
                controller: controller.clone(),
                action: ActionDescriptor {
                    subject_name: subject_name.clone(),
                    strategy_name: strategy.name().to_string(),
                    phase: route.phase,
                },
                strategy: Arc::clone(&strategy),
            });
        }
    }

    tracing::debug!(
        resource = %resource,
        tuples = tuples.len(),
        "Enumerated strategy routes"
    );

    Ok(tuples)
}
