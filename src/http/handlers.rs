//! Demo endpoints served behind the declared routes.
//!
//! Pages answer with the mount context they would render with. Controllers
//! finish the flow: sign-out and completed sign-in phases redirect to the
//! sanitized `next` target, forwards ask the dispatcher for a handler.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::http::host::{endpoint, Endpoint, RouteBinding};
use crate::routing::hooks::Hook;
use crate::routing::kind::RouteKind;
use crate::routing::strategy::{HttpMethod, RouteTuple};
use crate::security::return_to::ReturnTo;

/// Phases after which the user is signed in.
const COMPLETING_PHASES: [&str; 3] = ["sign_in", "sign_in_with_token", "callback"];

/// Renders the page's mount context as JSON.
pub fn view() -> Endpoint {
    endpoint(|binding: Arc<RouteBinding>, request: Request<Body>| async move {
        let route = binding.route();
        tracing::debug!(route = %route.route_name, path = %request.uri().path(), "Mounting page");

        Json(json!({
            "route": route.route_name,
            "kind": route.kind,
            "action": route.action,
            "request_path": request.uri().path(),
            "layout": route.layout,
            "hooks": route.hooks.iter().map(Hook::id).collect::<Vec<_>>(),
            "session": route.session.to_json(),
            "scope_options": route.scope_options,
        }))
        .into_response()
    })
}

/// Sign-out, strategy phases and dispatched forwards.
pub fn controller(return_to: ReturnTo) -> Endpoint {
    endpoint(move |binding: Arc<RouteBinding>, request: Request<Body>| {
        let return_to = return_to.clone();
        async move {
            match binding.as_ref() {
                RouteBinding::Route(route) if route.kind == RouteKind::SignOut => {
                    tracing::info!(route = %route.route_name, "Signed out");
                    return_to.redirect(request.uri()).into_response()
                }
                RouteBinding::Route(route) => {
                    Json(json!({ "route": route.route_name })).into_response()
                }
                RouteBinding::Tuple { name, tuple, .. } => {
                    strategy_phase(&return_to, name, tuple, &request)
                }
                RouteBinding::Forward { route, dispatcher } => {
                    let prefix = route.path.trim_end_matches('/');
                    let rest = request.uri().path().strip_prefix(prefix).unwrap_or_default();
                    let segments: Vec<&str> =
                        rest.split('/').filter(|s| !s.is_empty()).collect();

                    let (Some(resource), [_subject, strategy, tail @ ..], Some(method)) = (
                        route.resource(),
                        segments.as_slice(),
                        http_method(request.method()),
                    ) else {
                        return StatusCode::NOT_FOUND.into_response();
                    };
                    let phase = tail.join("/");

                    match dispatcher.match_phase(resource, strategy, &phase, method) {
                        Some(handler) => Json(json!({
                            "resource": resource,
                            "strategy": strategy,
                            "phase": phase,
                            "handler": handler,
                        }))
                        .into_response(),
                        None => {
                            tracing::debug!(
                                resource = %resource,
                                strategy = %strategy,
                                phase = %phase,
                                method = %method,
                                "No strategy phase matched"
                            );
                            StatusCode::NOT_FOUND.into_response()
                        }
                    }
                }
            }
        }
    })
}

fn strategy_phase(
    return_to: &ReturnTo,
    name: &str,
    tuple: &RouteTuple,
    request: &Request<Body>,
) -> Response {
    if COMPLETING_PHASES.contains(&tuple.action.phase.as_str()) {
        tracing::info!(route = %name, strategy = %tuple.action.strategy_name, "Signed in");
        return return_to.redirect(request.uri()).into_response();
    }

    Json(json!({
        "route": name,
        "action": tuple.action,
    }))
    .into_response()
}

fn http_method(method: &Method) -> Option<HttpMethod> {
    match *method {
        Method::GET => Some(HttpMethod::Get),
        Method::POST => Some(HttpMethod::Post),
        Method::PUT => Some(HttpMethod::Put),
        Method::PATCH => Some(HttpMethod::Patch),
        Method::DELETE => Some(HttpMethod::Delete),
        _ => None,
    }
}
