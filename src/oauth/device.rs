//! Device authorization grant (RFC 8628).
//!
//! 1. Request a device code from the authorization server
//! 2. Show the verification URL and user code
//! 3. Poll the token endpoint until the user approves, the server rejects
//!    the request, or the device code expires

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::error::AuthError;
use crate::http::post_form;
use crate::oauth::token::TokenResponse;

pub const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Extra wait added to the interval when the server answers `slow_down`.
pub const SLOW_DOWN_STEP: Duration = Duration::from_secs(2);

/// Response from the device authorization endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAuthorization {
    pub device_code: String,
    #[serde(default)]
    pub user_code: Option<String>,
    #[serde(default)]
    pub verification_uri: Option<String>,
    #[serde(default)]
    pub verification_uri_complete: Option<String>,
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_interval() -> u64 {
    5
}

fn default_expires_in() -> u64 {
    300
}

impl DeviceAuthorization {
    /// The URL to show the user; the complete variant embeds the user code.
    pub fn display_uri(&self) -> Option<&str> {
        self.verification_uri_complete
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.verification_uri.as_deref().filter(|u| !u.is_empty()))
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.interval),
            slow_down_step: SLOW_DOWN_STEP,
            timeout: Duration::from_secs(self.expires_in),
        }
    }
}

/// Timing for the token polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub slow_down_step: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    /// Wait after a `slow_down` reply.
    pub fn slow_down_wait(&self) -> Duration {
        self.interval.saturating_add(self.slow_down_step)
    }

    /// Cap the overall wait at `ceiling`.
    pub fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.timeout = self.timeout.min(ceiling);
        self
    }
}

pub async fn request_device_code(
    client: &reqwest::Client,
    endpoint: &str,
    client_id: &str,
    scope: &str,
) -> Result<DeviceAuthorization, AuthError> {
    let resp = post_form(client, endpoint, &[("client_id", client_id), ("scope", scope)]).await?;
    if !resp.is_success() {
        return Err(resp.into_http_error("device authorization"));
    }
    Ok(serde_json::from_value(resp.body)?)
}

/// Poll the token endpoint until the user approves the device.
///
/// `authorization_pending` waits one interval, `slow_down` waits the
/// interval plus [`PollSettings::slow_down_step`]. Any other error response
/// is fatal.
pub async fn poll_for_token(
    client: &reqwest::Client,
    token_endpoint: &str,
    client_id: &str,
    device_code: &str,
    settings: PollSettings,
) -> Result<TokenResponse, AuthError> {
    let start = Instant::now();
    let form = [
        ("client_id", client_id),
        ("device_code", device_code),
        ("grant_type", DEVICE_CODE_GRANT),
    ];

    while start.elapsed() < settings.timeout {
        let resp = post_form(client, token_endpoint, &form).await?;
        if resp.status == 200 {
            return Ok(serde_json::from_value(resp.body)?);
        }

        match resp.oauth_error() {
            Some("authorization_pending") => {
                tracing::debug!("authorization pending, polling again");
                tokio::time::sleep(settings.interval).await;
            }
            Some("slow_down") => {
                tracing::debug!("slow_down requested");
                tokio::time::sleep(settings.slow_down_wait()).await;
            }
            _ => return Err(resp.into_http_error("token poll")),
        }
    }

    Err(AuthError::timeout("authorization timeout"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_device_authorization_defaults() {
        let auth: DeviceAuthorization =
            serde_json::from_str(r#"{"device_code": "dc"}"#).unwrap();
        assert_eq!(auth.device_code, "dc");
        assert_eq!(auth.interval, 5);
        assert_eq!(auth.expires_in, 300);
        assert!(auth.display_uri().is_none());
    }

    #[test]
    fn display_uri_prefers_complete() {
        let auth: DeviceAuthorization = serde_json::from_str(
            r#"{
                "device_code": "dc",
                "user_code": "ABCD-EFGH",
                "verification_uri": "https://login.example.com/device",
                "verification_uri_complete": "https://login.example.com/device?user_code=ABCD-EFGH",
                "interval": 3,
                "expires_in": 600
            }"#,
        )
        .unwrap();
        assert_eq!(
            auth.display_uri(),
            Some("https://login.example.com/device?user_code=ABCD-EFGH")
        );
        let settings = auth.poll_settings();
        assert_eq!(settings.interval, Duration::from_secs(3));
        assert_eq!(settings.timeout, Duration::from_secs(600));
        assert_eq!(settings.slow_down_step, SLOW_DOWN_STEP);
    }

    #[test]
    fn display_uri_falls_back_to_plain() {
        let auth: DeviceAuthorization = serde_json::from_str(
            r#"{"device_code": "dc", "verification_uri": "https://login.example.com/device"}"#,
        )
        .unwrap();
        assert_eq!(auth.display_uri(), Some("https://login.example.com/device"));
    }

    #[test]
    fn slow_down_wait_adds_step() {
        let settings = PollSettings {
            interval: Duration::from_secs(5),
            slow_down_step: SLOW_DOWN_STEP,
            timeout: Duration::from_secs(300),
        };
        assert_eq!(settings.slow_down_wait(), Duration::from_secs(7));
    }

    #[test]
    fn slow_down_wait_saturates_on_huge_interval() {
        let auth: DeviceAuthorization =
            serde_json::from_str(r#"{"device_code": "dc", "interval": 18446744073709551615}"#)
                .unwrap();
        assert_eq!(auth.poll_settings().slow_down_wait(), Duration::MAX);
    }

    #[test]
    fn ceiling_caps_timeout() {
        let settings = PollSettings {
            interval: Duration::from_secs(5),
            slow_down_step: SLOW_DOWN_STEP,
            timeout: Duration::from_secs(300),
        };
        assert_eq!(
            settings.with_ceiling(Duration::from_secs(60)).timeout,
            Duration::from_secs(60)
        );
        assert_eq!(
            settings.with_ceiling(Duration::from_secs(900)).timeout,
            Duration::from_secs(300)
        );
    }
}
