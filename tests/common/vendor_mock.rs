use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount a token endpoint that answers every `grant_type` POST with `body`.
#[allow(dead_code)]
pub async fn mount_token(server: &MockServer, grant: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains(format!("grant_type={grant}")))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a device authorization endpoint with a zero poll interval.
#[allow(dead_code)]
pub async fn mount_device_authorize(server: &MockServer, expires_in: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/device_authorize"))
        .and(body_string_contains("client_id="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "device-123",
            "user_code": "ABCD-EFGH",
            "verification_uri": format!("{}/device", server.uri()),
            "verification_uri_complete": format!("{}/device?user_code=ABCD-EFGH", server.uri()),
            "interval": 0,
            "expires_in": expires_in,
        })))
        .mount(server)
        .await;
}

/// Mount a `/me` endpoint listing the given home IDs.
#[allow(dead_code)]
pub async fn mount_me(server: &MockServer, homes: &[u64]) {
    let homes: Vec<_> = homes.iter().map(|id| json!({"id": id, "name": "Home"})).collect();
    Mock::given(method("GET"))
        .and(path("/api/v2/me"))
        .and(wiremock::matchers::header("authorization", "Bearer access-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Alice",
            "homes": homes,
        })))
        .mount(server)
        .await;
}

/// The usual successful token body.
#[allow(dead_code)]
pub fn token_body() -> serde_json::Value {
    json!({
        "access_token": "access-abc",
        "refresh_token": "refresh-xyz",
        "expires_in": 600,
        "token_type": "Bearer",
        "scope": "offline_access",
    })
}
