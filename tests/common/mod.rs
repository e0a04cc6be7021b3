use std::sync::Arc;

use neo::sca::DefaultScaResolver;
use neo::{Client, Identity, NeoConfig};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/auth/realms/sandbox/protocol/openid-connect/token";

pub fn token_body(access: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access,
        "token_type": "bearer",
        "expires_in": 300,
        "refresh_token": format!("{access}-refresh"),
        "refresh_expires_in": 1800,
        "session_state": "state"
    })
}

/// Mount the token endpoint: the client-credentials grant yields `initial`,
/// the refresh grant yields `refreshed`.
#[allow(dead_code)]
pub async fn mount_token_endpoint(server: &MockServer, initial: &str, refreshed: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(initial)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(refreshed)))
        .mount(server)
        .await;
}

/// A client talking to the mock server over real HTTP, treating the mock
/// host as the platform's own domain.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> Client {
    Client::new(
        Identity::new("cid", "secret"),
        &server.uri(),
        Arc::new(reqwest::Client::new()),
    )
    .with_resolver(Some(Arc::new(DefaultScaResolver::new("127.0.0.1"))))
}

/// A step-up error body pointing at `href`.
#[allow(dead_code)]
pub fn step_up_body(code: &str, href: &str, link_id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "err-1",
        "errorCode": code,
        "message": "strong customer authentication required",
        "source": "NEONOMICS",
        "type": "CONSENT",
        "timestamp": 1700000000000i64,
        "links": [{"type": "GET", "rel": "consent", "href": href, "meta": {"id": link_id}}]
    })
}

/// Write `config` to a temp directory and return both.
#[allow(dead_code)]
pub fn temp_config(config: &NeoConfig) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("neo.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(config).unwrap()).unwrap();
    (dir, config_path)
}
