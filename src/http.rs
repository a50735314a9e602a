use std::time::Duration;

use serde_json::Value;

use crate::error::AuthError;

/// Timeout used for the Daikin token exchange.
pub const DAIKIN_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout used for every tado request.
pub const TADO_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// A decoded response from a form POST: status code plus JSON body.
#[derive(Debug, Clone)]
pub struct FormResponse {
    pub status: u16,
    pub body: Value,
}

impl FormResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The OAuth `error` field, if the body carries one.
    pub fn oauth_error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    pub(crate) fn into_http_error(self, context: &'static str) -> AuthError {
        AuthError::Http {
            context,
            status: self.status,
            body: self.body.to_string(),
        }
    }
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, AuthError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AuthError::request("<client>", e))
}

/// POST an `application/x-www-form-urlencoded` body and decode the reply.
///
/// Error statuses are returned as values rather than errors so OAuth
/// polling can inspect the `error` field. A body that is not JSON is
/// wrapped as `{"error": "<body>"}`.
pub async fn post_form(
    client: &reqwest::Client,
    url: &str,
    form: &[(&str, &str)],
) -> Result<FormResponse, AuthError> {
    tracing::debug!(url, "POST form");
    let resp = client
        .post(url)
        .form(form)
        .send()
        .await
        .map_err(|e| AuthError::request(url, e))?;

    let status = resp.status().as_u16();
    let text = resp.text().await.map_err(|e| AuthError::request(url, e))?;
    let body = decode_body(status, &text)?;
    Ok(FormResponse { status, body })
}

fn decode_body(status: u16, text: &str) -> Result<Value, AuthError> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(v),
        Err(_) if !(200..300).contains(&status) => Ok(serde_json::json!({ "error": text.trim() })),
        Err(e) => Err(AuthError::Json(e)),
    }
}

/// GET a JSON document with a bearer token.
pub async fn get_json_bearer(
    client: &reqwest::Client,
    url: &str,
    access_token: &str,
) -> Result<Value, AuthError> {
    tracing::debug!(url, "GET");
    let resp = client
        .get(url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| AuthError::request(url, e))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AuthError::Http {
            context: "GET request",
            status: status.as_u16(),
            body,
        });
    }

    resp.json().await.map_err(|e| AuthError::request(url, e))
}
