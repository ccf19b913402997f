//! Redirect target sanitization.

use auth_routes::config::RedirectConfig;
use auth_routes::security::redirect::{DEFAULT_UNSAFE_PATHS, RedirectPolicy};
use auth_routes::sanitize;

fn with_fallback(fallback: &str) -> RedirectConfig {
    RedirectConfig {
        fallback: fallback.into(),
        ..RedirectConfig::default()
    }
}

#[test]
fn test_concrete_scenarios() {
    let defaults = RedirectConfig::default();

    assert_eq!(sanitize("/dashboard", &defaults), "/dashboard");
    assert_eq!(sanitize("https://evil.com", &with_fallback("/home")), "/home");
    assert_eq!(
        sanitize(
            "/custom",
            &RedirectConfig {
                unsafe_paths: vec!["/custom".into()],
                ..with_fallback("/home")
            }
        ),
        "/home"
    );
    assert_eq!(
        sanitize(
            "ftp://localhost/",
            &RedirectConfig {
                safe_schemes: vec!["ftp".into()],
                ..RedirectConfig::default()
            }
        ),
        "ftp://localhost/"
    );
    assert_eq!(sanitize("http://localhost.evil.com", &defaults), "/");
    assert_eq!(sanitize("///danger", &defaults), "/");
    assert_eq!(sanitize("?admin=true", &defaults), "?admin=true");
}

#[test]
fn test_unsafe_paths_match_exactly() {
    let policy = RedirectPolicy::new(&with_fallback("/home"));

    for path in DEFAULT_UNSAFE_PATHS {
        assert_eq!(policy.sanitize(path), "/home", "{path}");
        assert_eq!(policy.sanitize(&format!("{path}?next=/x")), "/home", "{path}");
        assert_eq!(
            policy.sanitize(&format!("http://localhost{path}")),
            "/home",
            "{path}"
        );
    }

    assert_eq!(policy.sanitize("/sign-in-custom"), "/sign-in-custom");
    assert_eq!(policy.sanitize("/auth/user"), "/auth/user");
    assert_eq!(policy.sanitize("/sign-in/"), "/sign-in/");
}

#[test]
fn test_protocol_relative_targets_fall_back() {
    let policy = RedirectPolicy::new(&RedirectConfig {
        safe_hosts: vec!["evil.com".into()],
        ..with_fallback("/home")
    });

    for candidate in ["//evil.com", "///evil.com", "////x", "//localhost/ok", "//"] {
        assert_eq!(policy.sanitize(candidate), "/home", "{candidate}");
    }
}

#[test]
fn test_foreign_hosts_fall_back() {
    let policy = RedirectPolicy::default();

    for candidate in [
        "https://evil.com",
        "http://localhost.evil.com/x",
        "http://evil.com@localhost.evil.com",
        "https://sub.localhost",
        "http://127.0.0.1.evil.com",
        "http:evil.com",
        "javascript:alert(1)",
        "data:text/html,hi",
        "/\\evil.com",
        " //evil.com",
    ] {
        assert_eq!(policy.sanitize(candidate), "/", "{candidate}");
    }

    assert_eq!(policy.sanitize("http://localhost:4000/x"), "http://localhost:4000/x");
    assert_eq!(policy.sanitize("https://127.0.0.1/"), "https://127.0.0.1/");
}

#[test]
fn test_relative_references_pass_unchanged() {
    let policy = RedirectPolicy::default();

    for candidate in [
        "/",
        "/a/b/",
        "/a/../b",
        "./settings",
        "../up",
        "profile",
        "?tab=2",
        "#section",
        "/search?q=sign-in#results",
    ] {
        assert_eq!(policy.sanitize(candidate), candidate);
    }
}

#[test]
fn test_idempotent() {
    let configs = [
        RedirectConfig::default(),
        with_fallback("/home"),
        RedirectConfig {
            safe_hosts: vec!["example.com".into()],
            safe_schemes: vec!["ftp".into()],
            ..with_fallback("/start")
        },
    ];

    let candidates = [
        "/dashboard",
        "https://evil.com",
        "//x",
        "/sign-in",
        "ftp://example.com/f",
        "?q=1",
        "",
        "http://[::1]/",
    ];

    for config in &configs {
        for candidate in candidates {
            let once = sanitize(candidate, config);
            assert_eq!(sanitize(&once, config), once, "{candidate}");
        }
    }
}
