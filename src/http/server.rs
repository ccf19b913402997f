//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the route table from configuration onto an Axum Router
//! - Bind demo endpoints to every handler the declarations reference
//! - Wire up middleware (tracing)
//! - Serve until Ctrl+C

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::schema::AppConfig;
use crate::http::handlers;
use crate::http::host::{AxumHost, HandlerTable};
use crate::routing::error::RouteError;
use crate::routing::kind::RouteKind;
use crate::routing::options::DEFAULT_VIEWS;
use crate::routing::registrar::{self, DEFAULT_CONTROLLER};
use crate::security::return_to::ReturnTo;

/// HTTP server for the declared auth routes.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, RouteError> {
        let router = build_router(&config)?;
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until `shutdown` completes.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            router = %self.config.router.router,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Register every configured declaration onto an Axum router.
pub fn build_router(config: &AppConfig) -> Result<Router, RouteError> {
    let host = registrar::register_config(config, AxumHost::new(demo_handlers(config)))?;

    Ok(host
        .into_router()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
}

/// Demo endpoints for every handler the configuration can reach.
fn demo_handlers(config: &AppConfig) -> HandlerTable {
    let defaults = &config.router;
    let view = handlers::view();
    let controller = handlers::controller(ReturnTo::from_defaults(defaults));

    let declared = config
        .routes
        .iter()
        .filter_map(|d| d.directives.handler.clone().map(|h| (d.kind, h)));
    let router_defaults = [
        RouteKind::SignIn,
        RouteKind::SignOut,
        RouteKind::Reset,
        RouteKind::Confirm,
        RouteKind::MagicSignIn,
        RouteKind::Auth,
    ]
    .into_iter()
    .filter_map(|kind| defaults.handler_for(kind).cloned().map(|h| (kind, h)));

    let mut table = HandlerTable::new().with(DEFAULT_CONTROLLER, Arc::clone(&controller));
    for name in DEFAULT_VIEWS {
        table = table.with(name, Arc::clone(&view));
    }
    for (kind, handler) in declared.chain(router_defaults) {
        let endpoint = if kind.is_view() { &view } else { &controller };
        table = table.with(handler, Arc::clone(endpoint));
    }
    table
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_build_router_from_config() {
        let config = parse_config(
            r#"
            [[resources]]
            id = "Accounts.User"
            subject_name = "user"

            [[resources.strategies]]
            name = "password"
            kind = "password"

            [[routes]]
            kind = "sign_in"

            [[routes]]
            kind = "sign_out"
            handler = "SessionController"

            [[routes]]
            kind = "auth_for"
            resource = "Accounts.User"
            handler = "AuthController"
            "#,
        )
        .unwrap();

        assert!(build_router(&config).is_ok());
    }

    #[test]
    fn test_build_router_reports_conflicts() {
        let config = parse_config(
            r#"
            [[routes]]
            kind = "sign_in"

            [[routes]]
            kind = "sign_in"
            as = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(
            build_router(&config).err(),
            Some(RouteError::RouteConflict {
                method: "GET".into(),
                path: "/sign-in".into(),
            })
        );
    }
}
