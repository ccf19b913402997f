//! Shared utilities for integration tests.

use std::net::SocketAddr;

use auth_routes::config::{parse_config, AppConfig};
use auth_routes::http::HttpServer;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A router with every route kind, one resource and two strategies.
pub const DEMO_CONFIG: &str = r#"
[router]
otp_app = "demo"
on_mount = ["locale"]

[router.handlers]
sign_out = "AuthController"
auth = "AuthController"

[router.redirect]
fallback = "/home"
safe_hosts = ["example.com"]

[[resources]]
id = "Accounts.User"
subject_name = "user"

[[resources.strategies]]
name = "password"
kind = "password"

[[resources.strategies]]
name = "github"
kind = "oauth2"

[[resources.add_ons]]
name = "confirm_new_user"
kind = "confirmation"

[[routes]]
kind = "sign_in"

[[routes]]
kind = "sign_out"

[[routes]]
kind = "reset"

[[routes]]
kind = "confirm"
resource = "Accounts.User"
strategy = "confirm_new_user"

[[routes]]
kind = "auth_for"
resource = "Accounts.User"
path = "/explicit"

[[routes]]
kind = "auth"
resource = "Accounts.User"
"#;

pub fn demo_config() -> AppConfig {
    parse_config(DEMO_CONFIG).unwrap()
}

/// Serve `config` on an ephemeral port until the returned sender fires or drops.
#[allow(dead_code)]
pub async fn start_server(config: AppConfig) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = server
            .run_until(listener, async {
                let _ = stopped.await;
            })
            .await;
    });

    (addr, stop)
}

/// A client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
