//! End-to-end tests against the demo host.

use reqwest::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_sign_in_page_mount_context() {
    let (addr, _stop) = common::start_server(common::demo_config()).await;

    let res = common::client()
        .get(format!("http://{addr}/sign-in"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["route"], "auth_sign_in");
    assert_eq!(
        body["hooks"],
        serde_json::json!(["auth_routes::load_session", "auth_routes::guard_session", "locale"])
    );
    assert_eq!(body["session"]["otp_app"], "demo");
    assert_eq!(body["session"]["register_path"], "/register");
    assert_eq!(body["session"]["auth_routes_prefix"], "/auth");
    assert_eq!(body["scope_options"]["alias"], false);
}

#[tokio::test]
async fn test_token_route_param() {
    let (addr, _stop) = common::start_server(common::demo_config()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{addr}/password-reset/abc123"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["route"], "auth_reset");
    assert_eq!(body["request_path"], "/password-reset/abc123");

    let res = client
        .get(format!("http://{addr}/confirm/xyz"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["session"]["strategy"], "confirm_new_user");
    assert_eq!(body["session"]["resource"], "Accounts.User");
}

#[tokio::test]
async fn test_sign_out_redirects_through_sanitizer() {
    let (addr, _stop) = common::start_server(common::demo_config()).await;
    let client = common::client();

    let cases = [
        ("/dashboard?tab=2", "/dashboard?tab=2"),
        ("https://evil.com", "/home"),
        ("//evil.com", "/home"),
        ("/sign-in", "/home"),
        ("https://example.com/welcome", "https://example.com/welcome"),
    ];

    for (next, expected) in cases {
        let res = client
            .get(format!("http://{addr}/sign-out"))
            .query(&[("next", next)])
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{next}");
        assert_eq!(res.headers()["location"], expected, "{next}");
    }

    let res = client
        .get(format!("http://{addr}/sign-out"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["location"], "/home");
}

#[tokio::test]
async fn test_explicit_strategy_routes() {
    let (addr, _stop) = common::start_server(common::demo_config()).await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/explicit/user/password/sign_in"))
        .query(&[("next", "/account")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/account");

    let res = client
        .get(format!("http://{addr}/explicit/user/password/sign_in"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = client
        .post(format!("http://{addr}/explicit/user/password/register"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["route"], "auth_user_password_register");
    assert_eq!(
        body["action"],
        serde_json::json!({
            "subject_name": "user",
            "strategy_name": "password",
            "phase": "register",
        })
    );
}

#[tokio::test]
async fn test_forward_dispatch() {
    let (addr, _stop) = common::start_server(common::demo_config()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{addr}/auth/user/github/callback"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["strategy"], "github");
    assert_eq!(body["phase"], "callback");
    assert_eq!(body["handler"], "AuthController");

    let res = client
        .post(format!("http://{addr}/auth/user/password/sign_in"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("http://{addr}/auth/user/password/register"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    for path in [
        "/auth",
        "/auth/user",
        "/auth/user/saml/request",
        "/auth/user/github/request",
    ] {
        let res = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_sign_in_page_served_at_register_and_reset_paths() {
    let (addr, _stop) = common::start_server(common::demo_config()).await;
    let client = common::client();

    for (path, route, action) in [
        ("/register", "auth_register", "register"),
        ("/reset", "auth_sign_in_reset", "reset"),
        ("/sign-in", "auth_sign_in", "sign_in"),
    ] {
        let res = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{path}");

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["route"], route);
        assert_eq!(body["kind"], "sign_in");
        assert_eq!(body["action"], action);
        assert_eq!(body["request_path"], path);
        assert_eq!(body["session"]["register_path"], "/register");
    }
}

#[tokio::test]
async fn test_undeclared_paths_are_not_served() {
    let (addr, _stop) = common::start_server(common::demo_config()).await;

    for path in ["/join", "/register/extra"] {
        let res = common::client()
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
    }
}
