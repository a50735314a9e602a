use std::net::SocketAddr;
use std::time::Duration;

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::error::AuthError;
use crate::oauth::authorize::RedirectTarget;

/// Query parameters delivered to the redirect URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Check the callback against the state we sent and hand back the code.
    ///
    /// A vendor `error` wins over everything else. A missing `state` is a
    /// mismatch.
    pub fn into_code(self, expected_state: &str) -> Result<String, AuthError> {
        if let Some(err) = self.error {
            return Err(AuthError::Authorization(err));
        }
        let code = self.code.ok_or(AuthError::MissingCode)?;
        if self.state.as_deref() != Some(expected_state) {
            return Err(AuthError::StateMismatch);
        }
        Ok(code)
    }

    fn acknowledgement(&self) -> String {
        if let Some(err) = &self.error {
            format!("Authorization failed: {err}\n")
        } else if self.code.is_some() {
            "Authorization received. You can close this window.\n".to_string()
        } else {
            "No authorization code received.\n".to_string()
        }
    }
}

/// A bound listener waiting to serve exactly one redirect.
pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    pub async fn bind(target: &RedirectTarget) -> Result<Self, AuthError> {
        let listener = TcpListener::bind(target.bind_addr()).await?;
        tracing::debug!(addr = %target.bind_addr(), "callback listener bound");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, AuthError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve one request on a background task.
    pub fn spawn(self) -> PendingCallback {
        let handle = tokio::spawn(async move { serve_one(self.listener).await });
        PendingCallback { handle }
    }
}

/// Handle to the background task serving the redirect.
pub struct PendingCallback {
    handle: JoinHandle<Result<CallbackParams, AuthError>>,
}

impl PendingCallback {
    pub async fn wait(mut self, timeout: Duration) -> Result<CallbackParams, AuthError> {
        match tokio::time::timeout(timeout, &mut self.handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(AuthError::Io(std::io::Error::other(join_err))),
            Err(_) => {
                self.handle.abort();
                tracing::debug!("no callback after {}s", timeout.as_secs());
                Err(AuthError::timeout("timed out waiting for authorization code"))
            }
        }
    }
}

async fn serve_one(listener: TcpListener) -> Result<CallbackParams, AuthError> {
    let (mut stream, peer) = listener.accept().await?;
    tracing::debug!(%peer, "callback connection accepted");

    let mut buf = vec![0u8; 8192];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let params = parse_callback_request(&request);

    // The browser may already be gone; the parameters are what matter.
    if let Err(e) = acknowledge(&mut stream, &params).await {
        tracing::debug!("callback acknowledgement not delivered: {e}");
    }

    Ok(params)
}

async fn acknowledge<W>(stream: &mut W, params: &CallbackParams) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = params.acknowledgement();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Pull `code`, `state` and `error` out of the request line of a raw HTTP request.
pub fn parse_callback_request(request: &str) -> CallbackParams {
    let mut params = CallbackParams::default();

    let Some(target) = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    else {
        return params;
    };

    let Ok(url) = Url::parse(&format!("http://localhost{target}")) else {
        return params;
    };

    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        let slot = match &*key {
            "code" => &mut params.code,
            "state" => &mut params.state,
            "error" => &mut params.error,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }
    params
}
