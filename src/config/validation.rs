//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the redirect fallback is itself a safe target
//! - Check resource and strategy declarations for duplicates and blanks
//! - Validate listener and metrics addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Route declarations are checked by the registrar, not here

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::security::redirect::RedirectPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("router name must not be empty")]
    EmptyRouterName,

    #[error("redirect parameter name must not be empty")]
    EmptyRedirectParam,

    #[error("redirect fallback `{0}` must be a local path that passes the redirect policy")]
    UnsafeFallback(String),

    #[error("resource `{0}` is declared more than once")]
    DuplicateResource(String),

    #[error("resource `{0}` has a strategy without a name")]
    EmptyStrategyName(String),

    #[error("{field} `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let router = &config.router;

    if router.router.trim().is_empty() {
        errors.push(ValidationError::EmptyRouterName);
    }

    if router.redirect_param.trim().is_empty() {
        errors.push(ValidationError::EmptyRedirectParam);
    }

    let fallback = &router.redirect.fallback;
    let policy = RedirectPolicy::new(&router.redirect);
    if !fallback.starts_with('/') || policy.check(fallback).is_err() {
        errors.push(ValidationError::UnsafeFallback(fallback.clone()));
    }

    let mut seen = HashSet::new();
    for resource in &config.resources {
        if !seen.insert(&resource.id) {
            errors.push(ValidationError::DuplicateResource(resource.id.to_string()));
        }
        if resource
            .strategies
            .iter()
            .chain(&resource.add_ons)
            .any(|s| s.name.trim().is_empty())
        {
            errors.push(ValidationError::EmptyStrategyName(resource.id.to_string()));
        }
    }

    let addresses = [
        ("listener.bind_address", &config.listener.bind_address),
        (
            "observability.metrics_address",
            &config.observability.metrics_address,
        ),
    ];
    for (field, value) in addresses {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
