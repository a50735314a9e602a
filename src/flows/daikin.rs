//! Authorization-code flow against the Daikin Onecta identity provider.

use std::path::PathBuf;
use std::time::Duration;

use crate::browser;
use crate::error::AuthError;
use crate::http::{build_client, DAIKIN_HTTP_TIMEOUT};
use crate::oauth::{
    build_authorize_url, exchange_code, generate_state, CallbackListener, PendingCallback,
    RedirectTarget,
};
use crate::persist::{write_credentials, CredentialRecord, FileLayout};

pub const DEFAULT_AUTHORIZE_URL: &str = "https://idp.onecta.daikineurope.com/v1/oidc/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://idp.onecta.daikineurope.com/v1/oidc/token";
pub const DEFAULT_SCOPE: &str = "openid onecta:basic.integration";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8765/callback";
pub const DEFAULT_OUT: &str = "/tmp/daikin-onecta-refresh.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const MISSING_REFRESH_TOKEN: &str = "no refresh_token returned; check scope/redirect URI";

#[derive(Debug, Clone)]
pub struct DaikinOptions {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub authorize_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub out: PathBuf,
    pub timeout: Duration,
}

impl DaikinOptions {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: String::new(),
            scope: DEFAULT_SCOPE.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            out: PathBuf::from(DEFAULT_OUT),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One authorization attempt: the listener is already serving when this exists.
pub struct DaikinSession {
    opts: DaikinOptions,
    state: String,
    authorize_url: String,
    pending: PendingCallback,
}

impl DaikinSession {
    /// Validate the redirect URI, start the callback listener and build the
    /// authorize URL.
    pub async fn start(opts: DaikinOptions) -> Result<Self, AuthError> {
        if opts.client_id.is_empty() {
            return Err(AuthError::Credentials(
                "client-id is required (or provide --credentials-file)".to_string(),
            ));
        }
        let target = RedirectTarget::parse(&opts.redirect_uri)?;

        let state = generate_state();
        let authorize_url = build_authorize_url(
            &opts.authorize_url,
            &opts.client_id,
            &opts.redirect_uri,
            &opts.scope,
            &state,
        )?;

        let pending = CallbackListener::bind(&target).await?.spawn();

        Ok(Self {
            opts,
            state,
            authorize_url,
            pending,
        })
    }

    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn redirect_uri(&self) -> &str {
        &self.opts.redirect_uri
    }

    /// Wait for the redirect, exchange the code and write the output file.
    pub async fn finish(self) -> Result<CredentialRecord, AuthError> {
        let params = self.pending.wait(self.opts.timeout).await?;
        let code = params.into_code(&self.state)?;
        tracing::debug!("authorization code received");

        let client = build_client(DAIKIN_HTTP_TIMEOUT)?;
        let token = exchange_code(
            &client,
            &self.opts.token_url,
            &code,
            &self.opts.redirect_uri,
            &self.opts.client_id,
            &self.opts.client_secret,
        )
        .await?;
        let refresh_token = token.require_refresh_token(MISSING_REFRESH_TOKEN)?;

        let record = CredentialRecord {
            client_id: self.opts.client_id,
            client_secret: self.opts.client_secret,
            refresh_token,
            scope: self.opts.scope,
        };
        write_credentials(&self.opts.out, &record, FileLayout::Daikin)?;
        Ok(record)
    }
}

/// Full interactive run: print the URL, optionally open it, wait, persist.
pub async fn run(opts: DaikinOptions, open_browser: bool) -> Result<CredentialRecord, AuthError> {
    let out = opts.out.clone();
    let session = DaikinSession::start(opts).await?;

    println!("Open this URL to authorize Daikin Onecta:");
    println!("{}", session.authorize_url());
    println!();
    println!("Redirect URI: {}", session.redirect_uri());
    println!("Ensure this redirect URI is configured in the Daikin Developer Portal app.");

    if open_browser {
        browser::open_best_effort(session.authorize_url());
    }

    let record = session.finish().await?;
    println!("Wrote refresh token JSON to {}", out.display());
    Ok(record)
}
