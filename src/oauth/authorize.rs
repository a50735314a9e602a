use reqwest::Url;

use crate::error::AuthError;

/// Host and port the callback listener binds to, taken from the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub uri: String,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl RedirectTarget {
    pub fn parse(uri: &str) -> Result<Self, AuthError> {
        let parsed = Url::parse(uri)
            .map_err(|e| AuthError::RedirectUri(format!("invalid redirect URI {uri:?}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AuthError::RedirectUri(
                "redirect URI must be http or https".to_string(),
            ));
        }

        let (host, port) = match (parsed.host_str(), parsed.port()) {
            (Some(h), Some(p)) if !h.is_empty() => (h, p),
            _ => {
                return Err(AuthError::RedirectUri(
                    "redirect URI must include host and port (e.g. http://127.0.0.1:8765/callback)"
                        .to_string(),
                ))
            }
        };

        // IPv6 hosts come back bracketed; the socket address wants them bare.
        let host = host.trim_start_matches('[').trim_end_matches(']').to_string();

        Ok(Self {
            uri: uri.to_string(),
            host,
            port,
            path: parsed.path().to_string(),
        })
    }

    /// `host:port` suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Build the browser authorization URL for the authorization-code grant.
pub fn build_authorize_url(
    authorize_endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<String, AuthError> {
    let mut url = Url::parse(authorize_endpoint).map_err(|e| {
        AuthError::RedirectUri(format!("invalid authorize URL {authorize_endpoint:?}: {e}"))
    })?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", scope)
        .append_pair("state", state);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_value(url: &str, key: &str) -> Option<String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn parse_default_redirect() {
        let target = RedirectTarget::parse("http://127.0.0.1:8765/callback").unwrap();
        assert_eq!(target.host, "127.0.0.1");
        assert_eq!(target.port, 8765);
        assert_eq!(target.path, "/callback");
        assert_eq!(target.bind_addr(), "127.0.0.1:8765");
    }

    #[test]
    fn parse_rejects_non_http_scheme() {
        let err = RedirectTarget::parse("ftp://127.0.0.1:21/cb").unwrap_err();
        assert_eq!(err.to_string(), "redirect URI must be http or https");
    }

    #[test]
    fn parse_requires_explicit_port() {
        let err = RedirectTarget::parse("http://localhost/callback").unwrap_err();
        assert!(err.to_string().contains("must include host and port"));
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = RedirectTarget::parse("not a uri").unwrap_err();
        assert_eq!(err.code(), "redirect_uri");
    }

    #[test]
    fn parse_ipv6_host() {
        let target = RedirectTarget::parse("http://[::1]:9000/cb").unwrap();
        assert_eq!(target.host, "::1");
        assert_eq!(target.bind_addr(), "[::1]:9000");
    }

    #[test]
    fn authorize_url_carries_all_parameters() {
        let url = build_authorize_url(
            "https://idp.example.com/v1/oidc/authorize",
            "client-abc",
            "http://127.0.0.1:8765/callback",
            "openid onecta:basic.integration",
            "1700000000-00ff",
        )
        .unwrap();

        assert!(url.starts_with("https://idp.example.com/v1/oidc/authorize?"));
        assert_eq!(query_value(&url, "response_type").as_deref(), Some("code"));
        assert_eq!(query_value(&url, "client_id").as_deref(), Some("client-abc"));
        assert_eq!(
            query_value(&url, "redirect_uri").as_deref(),
            Some("http://127.0.0.1:8765/callback")
        );
        assert_eq!(
            query_value(&url, "scope").as_deref(),
            Some("openid onecta:basic.integration")
        );
        assert_eq!(query_value(&url, "state").as_deref(), Some("1700000000-00ff"));
    }

    #[test]
    fn authorize_url_encodes_redirect() {
        let url = build_authorize_url(
            "https://idp.example.com/authorize",
            "c",
            "http://127.0.0.1:8765/callback",
            "openid",
            "s",
        )
        .unwrap();
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8765%2Fcallback"));
    }

    #[test]
    fn authorize_url_keeps_existing_query() {
        let url = build_authorize_url("https://idp.example.com/authorize?prompt=login", "c", "r", "s", "st")
            .unwrap();
        assert_eq!(query_value(&url, "prompt").as_deref(), Some("login"));
        assert_eq!(query_value(&url, "client_id").as_deref(), Some("c"));
    }
}
