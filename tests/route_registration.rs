//! Route registration through the public API.

use std::sync::Arc;

use auth_routes::config::RouterDefaults;
use auth_routes::routing::hooks::{SESSION_GUARD, SESSION_LOADER};
use auth_routes::routing::strategy::{
    AuthStrategy, HttpMethod, StrategyIntrospection, StrategyRoute,
};
use auth_routes::routing::table::Registration;
use auth_routes::routing::{
    Directives, Hook, PathValue, ResourceId, RouteError, RouteRegistrar, RouteTable,
};

mod common;

/// A strategy with an explicit phase table.
#[derive(Debug)]
struct TableStrategy {
    name: &'static str,
    phases: Vec<(&'static str, HttpMethod)>,
}

impl AuthStrategy for TableStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn routes(&self) -> Vec<StrategyRoute> {
        self.phases
            .iter()
            .map(|(phase, _)| StrategyRoute::new(format!("/member/{}/{phase}", self.name), *phase))
            .collect()
    }

    fn method_for_phase(&self, phase: &str) -> Option<HttpMethod> {
        self.phases
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, method)| *method)
    }
}

struct Members {
    add_ons: Vec<Arc<dyn AuthStrategy>>,
    primary: Vec<Arc<dyn AuthStrategy>>,
}

impl StrategyIntrospection for Members {
    fn subject_name(&self, resource: &ResourceId) -> Option<String> {
        (resource.as_str() == "Club.Member").then(|| "member".to_string())
    }

    fn add_on_strategies(&self, _: &ResourceId) -> Vec<Arc<dyn AuthStrategy>> {
        self.add_ons.clone()
    }

    fn strategies(&self, _: &ResourceId) -> Vec<Arc<dyn AuthStrategy>> {
        self.primary.clone()
    }
}

fn members() -> Members {
    Members {
        add_ons: vec![Arc::new(TableStrategy {
            name: "totp",
            phases: vec![("verify", HttpMethod::Post)],
        })],
        primary: vec![
            Arc::new(TableStrategy {
                name: "password",
                phases: vec![("sign_in", HttpMethod::Post), ("reset", HttpMethod::Patch)],
            }),
            Arc::new(TableStrategy {
                name: "apple",
                phases: vec![("request", HttpMethod::Get), ("callback", HttpMethod::Post)],
            }),
        ],
    }
}

#[test]
fn test_one_tuple_per_strategy_phase_in_order() {
    let defaults = RouterDefaults::default();
    let members = members();
    let mut registrar =
        RouteRegistrar::new(&defaults, RouteTable::new()).with_introspection(&members);

    registrar
        .auth_routes_for("MemberController", "Club.Member", Directives::new())
        .unwrap();
    let table = registrar.finish();

    let rows: Vec<(String, String, HttpMethod)> = table
        .iter()
        .map(|r| match r {
            Registration::Tuple { tuple, .. } => (
                tuple.action.strategy_name.clone(),
                tuple.action.phase.clone(),
                tuple.method,
            ),
            _ => panic!("expected only tuples"),
        })
        .collect();

    let expected = [
        ("totp", "verify", HttpMethod::Post),
        ("password", "sign_in", HttpMethod::Post),
        ("password", "reset", HttpMethod::Patch),
        ("apple", "request", HttpMethod::Get),
        ("apple", "callback", HttpMethod::Post),
    ];
    assert_eq!(rows.len(), expected.len());
    for (row, (strategy, phase, method)) in rows.iter().zip(expected) {
        assert_eq!((row.0.as_str(), row.1.as_str(), row.2), (strategy, phase, method));
    }

    let first = table.iter().next().unwrap();
    assert_eq!(first.path(), "/auth/member/totp/verify");
    assert_eq!(first.name(), "auth_member_totp_verify");
    assert_eq!(first.route().handler.as_str(), "MemberController");
}

#[test]
fn test_phase_without_method_fails_before_registration() {
    let defaults = RouterDefaults::default();
    let members = Members {
        add_ons: Vec::new(),
        primary: vec![
            Arc::new(TableStrategy {
                name: "password",
                phases: vec![("sign_in", HttpMethod::Post)],
            }),
            Arc::new(BrokenStrategy),
        ],
    };
    let mut registrar =
        RouteRegistrar::new(&defaults, RouteTable::new()).with_introspection(&members);

    let err = registrar
        .auth_routes_for("MemberController", "Club.Member", Directives::new())
        .err();
    assert_eq!(
        err,
        Some(RouteError::UnknownStrategyPhase {
            strategy: "broken".into(),
            phase: "mystery".into(),
        })
    );
    assert!(registrar.finish().is_empty());
}

#[derive(Debug)]
struct BrokenStrategy;

impl AuthStrategy for BrokenStrategy {
    fn name(&self) -> &str {
        "broken"
    }

    fn routes(&self) -> Vec<StrategyRoute> {
        vec![StrategyRoute::new("/member/broken", "mystery")]
    }

    fn method_for_phase(&self, _: &str) -> Option<HttpMethod> {
        None
    }
}

#[test]
fn test_missing_controller_fails_fast() {
    let defaults = RouterDefaults::default();
    let members = members();
    let mut registrar =
        RouteRegistrar::new(&defaults, RouteTable::new()).with_introspection(&members);

    let err = registrar
        .declare(
            auth_routes::routing::RouteKind::AuthFor,
            &Directives::new().resource("Club.Member"),
        )
        .err();
    assert!(matches!(
        err,
        Some(RouteError::MissingRequiredOption { option: "handler", .. })
    ));
}

#[test]
fn test_scoped_and_unscoped_paths_under_nested_scopes() {
    let defaults = RouterDefaults::default();
    let mut registrar = RouteRegistrar::new(&defaults, RouteTable::new());

    registrar
        .scope("/app", |r| {
            r.sign_in_route(
                Directives::new()
                    .auth_routes_prefix(PathValue::unscoped("/auth"))
                    .register_path(PathValue::scoped("/join")),
            )?;
            r.sign_out_route(
                "SessionController",
                Directives::new().path(PathValue::unscoped("/logout")),
            )?;
            Ok(())
        })
        .unwrap();

    let table = registrar.finish();
    let sign_in = table.iter().next().unwrap().route();
    assert_eq!(sign_in.path, "/app/sign-in");
    assert_eq!(sign_in.auth_routes_prefix.as_deref(), Some("/auth"));
    assert_eq!(
        sign_in
            .session
            .get("register_path")
            .and_then(|v| v.as_text()),
        Some("/app/join")
    );

    let paths: Vec<(&str, &str)> = table.iter().map(|r| (r.name(), r.path())).collect();
    assert_eq!(
        paths,
        vec![
            ("auth_sign_in", "/app/sign-in"),
            ("auth_register", "/app/join"),
            ("auth_sign_in_reset", "/app/reset"),
            ("auth_sign_out", "/logout"),
        ]
    );
}

#[test]
fn test_mandatory_hooks_appear_once() {
    let mut defaults = RouterDefaults::default();
    defaults.on_mount_prepend = vec![Hook::new(SESSION_GUARD)];

    let mut registrar = RouteRegistrar::new(&defaults, RouteTable::new());
    registrar
        .sign_in_route(Directives::new().on_mount(vec![
            Hook::with_arg(SESSION_LOADER, "admin"),
            Hook::new("audit"),
            Hook::new(SESSION_GUARD),
        ]))
        .unwrap();

    let table = registrar.finish();
    let hooks: Vec<&str> = table
        .iter()
        .next()
        .unwrap()
        .route()
        .hooks
        .iter()
        .map(Hook::id)
        .collect();
    assert_eq!(hooks, vec![SESSION_GUARD, SESSION_LOADER, "audit"]);
}

#[test]
fn test_demo_config_registers_every_kind() {
    let config = common::demo_config();
    let table =
        auth_routes::routing::registrar::register_config(&config, RouteTable::new()).unwrap();

    let names: Vec<&str> = table.iter().map(Registration::name).collect();
    assert_eq!(
        names,
        vec![
            "auth_sign_in",
            "auth_register",
            "auth_sign_in_reset",
            "auth_sign_out",
            "auth_reset",
            "auth_confirm",
            "auth_user_confirm_new_user_confirm",
            "auth_user_password_register",
            "auth_user_password_sign_in",
            "auth_user_password_reset_request",
            "auth_user_password_reset",
            "auth_user_password_sign_in_with_token",
            "auth_user_github_request",
            "auth_user_github_callback",
            "auth_auth",
        ]
    );
}
