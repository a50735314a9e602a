#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    RedirectUri(String),

    #[error("authorization error: {0}")]
    Authorization(String),

    #[error("state mismatch; aborting")]
    StateMismatch,

    #[error("missing code in callback")]
    MissingCode,

    #[error("{0}")]
    Timeout(String),

    #[error("{context} failed ({status}): {body}")]
    Http {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    MissingRefreshToken(String),

    #[error("{0}")]
    Credentials(String),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuthError {
    /// Stable tag for log fields and tests.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::RedirectUri(_) => "redirect_uri",
            AuthError::Authorization(_) => "authorization_error",
            AuthError::StateMismatch => "state_mismatch",
            AuthError::MissingCode => "missing_code",
            AuthError::Timeout(_) => "timeout",
            AuthError::Http { .. } => "http_error",
            AuthError::MissingRefreshToken(_) => "missing_refresh_token",
            AuthError::Credentials(_) => "credentials",
            AuthError::Request { .. } => "request_failed",
            AuthError::Json(_) => "json_error",
            AuthError::Yaml(_) => "yaml_error",
            AuthError::Io(_) => "io_error",
        }
    }

    pub(crate) fn request(url: &str, source: reqwest::Error) -> Self {
        AuthError::Request {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn timeout(what: &str) -> Self {
        AuthError::Timeout(what.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_state_mismatch() {
        assert_eq!(AuthError::StateMismatch.to_string(), "state mismatch; aborting");
    }

    #[test]
    fn display_authorization_error() {
        let err = AuthError::Authorization("access_denied".into());
        assert_eq!(err.to_string(), "authorization error: access_denied");
    }

    #[test]
    fn display_http_error() {
        let err = AuthError::Http {
            context: "token exchange",
            status: 400,
            body: "{\"error\":\"invalid_grant\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "token exchange failed (400): {\"error\":\"invalid_grant\"}"
        );
    }

    #[test]
    fn display_timeout_uses_message_only() {
        let err = AuthError::timeout("timed out waiting for authorization code");
        assert_eq!(err.to_string(), "timed out waiting for authorization code");
    }

    #[test]
    fn error_code_mapping() {
        assert_eq!(AuthError::RedirectUri("x".into()).code(), "redirect_uri");
        assert_eq!(AuthError::Authorization("x".into()).code(), "authorization_error");
        assert_eq!(AuthError::StateMismatch.code(), "state_mismatch");
        assert_eq!(AuthError::MissingCode.code(), "missing_code");
        assert_eq!(
            AuthError::timeout("authorization timeout").code(),
            "timeout"
        );
        assert_eq!(
            AuthError::Http {
                context: "device authorization",
                status: 500,
                body: String::new()
            }
            .code(),
            "http_error"
        );
        assert_eq!(
            AuthError::MissingRefreshToken("no refresh_token returned".into()).code(),
            "missing_refresh_token"
        );
        assert_eq!(AuthError::Credentials("x".into()).code(), "credentials");
        let io_err = std::io::Error::other("test");
        assert_eq!(AuthError::Io(io_err).code(), "io_error");
    }
}
