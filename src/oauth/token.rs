use serde::Deserialize;

use crate::error::AuthError;
use crate::http::post_form;

/// Token endpoint response. Every field is optional because vendors differ
/// in what they return; callers decide which absences are fatal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// The refresh token, treating an empty string as absent.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Take the refresh token or fail with `message`.
    pub fn require_refresh_token(&self, message: &str) -> Result<String, AuthError> {
        self.refresh_token()
            .map(str::to_string)
            .ok_or_else(|| AuthError::MissingRefreshToken(message.to_string()))
    }
}

/// Exchange an authorization code for tokens.
pub async fn exchange_code(
    client: &reqwest::Client,
    token_endpoint: &str,
    code: &str,
    redirect_uri: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<TokenResponse, AuthError> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("client_id", client_id),
    ];
    if !client_secret.is_empty() {
        form.push(("client_secret", client_secret));
    }

    let resp = post_form(client, token_endpoint, &form).await?;
    if !resp.is_success() {
        return Err(resp.into_http_error("token exchange"));
    }
    Ok(serde_json::from_value(resp.body)?)
}

/// Resource-owner password grant.
pub async fn password_grant(
    client: &reqwest::Client,
    token_endpoint: &str,
    client_id: &str,
    client_secret: &str,
    username: &str,
    password: &str,
    scope: &str,
) -> Result<TokenResponse, AuthError> {
    let mut form = vec![
        ("grant_type", "password"),
        ("username", username),
        ("password", password),
        ("client_id", client_id),
        ("scope", scope),
    ];
    if !client_secret.is_empty() {
        form.push(("client_secret", client_secret));
    }

    let resp = post_form(client, token_endpoint, &form).await?;
    if !resp.is_success() {
        return Err(resp.into_http_error("password grant"));
    }
    Ok(serde_json::from_value(resp.body)?)
}
