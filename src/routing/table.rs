//! A host that records registrations instead of serving them.

use std::sync::Arc;

use serde::Serialize;

use crate::routing::error::RouteError;
use crate::routing::ids::HandlerRef;
use crate::routing::kind::RouteKind;
use crate::routing::options::ResolvedRouteConfig;
use crate::routing::registrar::HostRouter;
use crate::routing::strategy::{ActionDescriptor, HttpMethod, RouteTuple, StrategyDispatcher};

/// One recorded registration.
#[derive(Clone)]
pub enum Registration {
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

impl Registration {
    pub fn name(&self) -> &str {
        match self {
            Registration::Route(route) | Registration::Forward { route, .. } => &route.route_name,
            Registration::Tuple { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Registration::Route(route) | Registration::Forward { route, .. } => &route.path,
            Registration::Tuple { tuple, .. } => &tuple.path,
        }
    }

    /// `None` matches every method.
    pub fn method(&self) -> Option<HttpMethod> {
        match self {
            Registration::Route(route) | Registration::Forward { route, .. } => route.method,
            Registration::Tuple { tuple, .. } => Some(tuple.method),
        }
    }

    /// The declaration this registration came from.
    pub fn route(&self) -> &ResolvedRouteConfig {
        match self {
            Registration::Route(route)
            | Registration::Forward { route, .. }
            | Registration::Tuple { route, .. } => route,
        }
    }

    pub fn summary(&self) -> RouteSummary {
        let route = self.route();
        RouteSummary {
            name: self.name().to_string(),
            kind: route.kind,
            method: self.method().map_or("*", HttpMethod::as_str),
            path: self.path().to_string(),
            handler: route.handler.clone(),
            action: match self {
                Registration::Tuple { tuple, .. } => Some(tuple.action.clone()),
                _ => None,
            },
            forward: matches!(self, Registration::Forward { .. }),
        }
    }
}

/// Serializable view of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub kind: RouteKind,
    pub method: &'static str,
    pub path: String,
    pub handler: HandlerRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDescriptor>,
    pub forward: bool,
}

/// Registrations in declaration order.
#[derive(Clone, Default)]
pub struct RouteTable {
    entries: Vec<Registration>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.entries.iter().map(Registration::summary).collect()
    }
}

impl HostRouter for RouteTable {
    fn register_route(&mut self, route: &ResolvedRouteConfig) -> Result<(), RouteError> {
        self.entries.push(Registration::Route(route.clone()));
        Ok(())
    }

    fn register_tuple(
        &mut self,
        name: &str,
        route: &ResolvedRouteConfig,
        tuple: &RouteTuple,
    ) -> Result<(), RouteError> {
        self.entries.push(Registration::Tuple {
            name: name.to_string(),
            route: route.clone(),
            tuple: tuple.clone(),
        });
        Ok(())
    }

    fn register_forward(
        &mut self,
        route: &ResolvedRouteConfig,
        dispatcher: Arc<dyn StrategyDispatcher>,
    ) -> Result<(), RouteError> {
        self.entries.push(Registration::Forward {
            route: route.clone(),
            dispatcher,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouterDefaults;
    use crate::routing::directives::Directives;
    use crate::routing::registrar::RouteRegistrar;

    #[test]
    fn test_summaries() {
        let defaults = RouterDefaults::default();
        let mut registrar = RouteRegistrar::new(&defaults, RouteTable::new());
        registrar.sign_in_route(Directives::new()).unwrap();
        let table = registrar.finish();

        let summaries = table.summaries();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].method, "GET");
        assert_eq!(
            serde_json::to_value(&summaries[0]).unwrap(),
            serde_json::json!({
                "name": "auth_sign_in",
                "kind": "sign_in",
                "method": "GET",
                "path": "/sign-in",
                "handler": "SignInLive",
                "forward": false,
            })
        );
    }
}
