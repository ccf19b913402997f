//! Strategies and resources declared in configuration.
//!
//! Each strategy kind carries a built-in phase table (path suffix and HTTP
//! method per phase). Phases declared in configuration override the table by
//! name or extend it. A `custom` strategy has no table at all.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::routing::ids::{HandlerRef, ResourceId};
use crate::routing::path::join_segments;
use crate::routing::strategy::{
    AuthStrategy, HttpMethod, StrategyDispatcher, StrategyIntrospection, StrategyRoute,
};

/// Built-in strategy families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Password,
    #[serde(rename = "oauth2")]
    OAuth2,
    MagicLink,
    Confirmation,
    Custom,
}

impl StrategyKind {
    /// (phase, path suffix, method) in route order.
    fn phase_table(self) -> &'static [(&'static str, &'static str, HttpMethod)] {
        match self {
            StrategyKind::Password => &[
                ("register", "register", HttpMethod::Post),
                ("sign_in", "sign_in", HttpMethod::Post),
                ("reset_request", "reset_request", HttpMethod::Post),
                ("reset", "reset", HttpMethod::Post),
                ("sign_in_with_token", "sign_in_with_token", HttpMethod::Get),
            ],
            StrategyKind::OAuth2 => &[
                ("request", "", HttpMethod::Get),
                ("callback", "callback", HttpMethod::Get),
            ],
            StrategyKind::MagicLink => &[
                ("request", "request", HttpMethod::Post),
                ("sign_in", "", HttpMethod::Get),
            ],
            StrategyKind::Confirmation => &[("confirm", "", HttpMethod::Get)],
            StrategyKind::Custom => &[],
        }
    }
}

/// A phase override or addition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhaseConfig {
    pub name: String,
    /// Path template; defaults to `/{subject}/{strategy}/{phase}`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub method: Option<HttpMethod>,
}

/// A strategy attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StrategyConfig {
    pub name: String,
    pub kind: StrategyKind,
    #[serde(default)]
    pub phases: Vec<PhaseConfig>,
}

/// An authenticated resource and its strategies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceConfig {
    pub id: ResourceId,
    pub subject_name: String,
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
    #[serde(default)]
    pub add_ons: Vec<StrategyConfig>,
}

#[derive(Debug, Clone)]
struct DeclaredPhase {
    name: String,
    path: String,
    method: Option<HttpMethod>,
}

/// A strategy built from [`StrategyConfig`].
#[derive(Debug, Clone)]
pub struct DeclaredStrategy {
    name: String,
    kind: StrategyKind,
    phases: Vec<DeclaredPhase>,
}

impl DeclaredStrategy {
    pub fn new(subject_name: &str, config: &StrategyConfig) -> Self {
        let default_path = |suffix: &str| join_segments([subject_name, config.name.as_str(), suffix]);

        let mut phases: Vec<DeclaredPhase> = config
            .kind
            .phase_table()
            .iter()
            .map(|(phase, suffix, method)| DeclaredPhase {
                name: (*phase).to_string(),
                path: default_path(*suffix),
                method: Some(*method),
            })
            .collect();

        for declared in &config.phases {
            match phases.iter_mut().find(|p| p.name == declared.name) {
                Some(existing) => {
                    if let Some(path) = &declared.path {
                        existing.path = path.clone();
                    }
                    if declared.method.is_some() {
                        existing.method = declared.method;
                    }
                }
                None => phases.push(DeclaredPhase {
                    name: declared.name.clone(),
                    path: declared
                        .path
                        .clone()
                        .unwrap_or_else(|| default_path(declared.name.as_str())),
                    method: declared.method,
                }),
            }
        }

        Self {
            name: config.name.clone(),
            kind: config.kind,
            phases,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }
}

impl AuthStrategy for DeclaredStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn routes(&self) -> Vec<StrategyRoute> {
        self.phases
            .iter()
            .map(|phase| StrategyRoute::new(phase.path.clone(), phase.name.clone()))
            .collect()
    }

    fn method_for_phase(&self, phase: &str) -> Option<HttpMethod> {
        self.phases
            .iter()
            .find(|p| p.name == phase)
            .and_then(|p| p.method)
    }
}

#[derive(Debug)]
struct CatalogEntry {
    id: ResourceId,
    subject_name: String,
    add_ons: Vec<Arc<dyn AuthStrategy>>,
    strategies: Vec<Arc<dyn AuthStrategy>>,
}

/// Strategy introspection over configured resources.
#[derive(Debug, Default)]
pub struct ResourceCatalog {
    entries: Vec<CatalogEntry>,
}

impl ResourceCatalog {
    pub fn from_config(resources: &[ResourceConfig]) -> Self {
        let build = |subject: &str, configs: &[StrategyConfig]| -> Vec<Arc<dyn AuthStrategy>> {
            configs
                .iter()
                .map(|c| Arc::new(DeclaredStrategy::new(subject, c)) as Arc<dyn AuthStrategy>)
                .collect()
        };

        let entries = resources
            .iter()
            .map(|r| CatalogEntry {
                id: r.id.clone(),
                subject_name: r.subject_name.clone(),
                add_ons: build(r.subject_name.as_str(), &r.add_ons),
                strategies: build(r.subject_name.as_str(), &r.strategies),
            })
            .collect();

        Self { entries }
    }

    /// Configured resource ids in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceId> {
        self.entries.iter().map(|e| &e.id)
    }

    fn entry(&self, resource: &ResourceId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.id == resource)
    }
}

impl StrategyIntrospection for ResourceCatalog {
    fn subject_name(&self, resource: &ResourceId) -> Option<String> {
        self.entry(resource).map(|e| e.subject_name.clone())
    }

    fn add_on_strategies(&self, resource: &ResourceId) -> Vec<Arc<dyn AuthStrategy>> {
        self.entry(resource)
            .map(|e| e.add_ons.clone())
            .unwrap_or_default()
    }

    fn strategies(&self, resource: &ResourceId) -> Vec<Arc<dyn AuthStrategy>> {
        self.entry(resource)
            .map(|e| e.strategies.clone())
            .unwrap_or_default()
    }
}

/// Request-time dispatch over a [`ResourceCatalog`].
///
/// A request matches a phase when its path below the strategy root equals the
/// phase's route path and its method is the phase's method. Every match is
/// served by the one configured controller.
#[derive(Debug, Clone)]
pub struct CatalogDispatcher {
    catalog: Arc<ResourceCatalog>,
    controller: HandlerRef,
}

impl CatalogDispatcher {
    pub fn new(catalog: Arc<ResourceCatalog>, controller: impl Into<HandlerRef>) -> Self {
        Self {
            catalog,
            controller: controller.into(),
        }
    }
}

impl StrategyDispatcher for CatalogDispatcher {
    fn match_phase(
        &self,
        resource: &ResourceId,
        strategy: &str,
        phase_path: &str,
        method: HttpMethod,
    ) -> Option<HandlerRef> {
        let entry = self.catalog.entry(resource)?;
        let requested = join_segments([entry.subject_name.as_str(), strategy, phase_path]);

        let found = entry
            .add_ons
            .iter()
            .chain(&entry.strategies)
            .filter(|s| s.name() == strategy)
            .any(|s| {
                s.routes().iter().any(|route| {
                    route.path == requested && s.method_for_phase(&route.phase) == Some(method)
                })
            });

        found.then(|| self.controller.clone())
    }
}
