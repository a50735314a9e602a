//! tado° helper: device-code grant by default, password grant as a fallback.

use std::path::PathBuf;
use std::time::Duration;

use crate::account::fetch_home_ids;
use crate::browser;
use crate::credentials::read_password_file;
use crate::error::AuthError;
use crate::http::{build_client, TADO_HTTP_TIMEOUT};
use crate::oauth::{password_grant, poll_for_token, request_device_code, TokenResponse};
use crate::persist::{write_credentials, CredentialRecord, FileLayout};

pub const DEVICE_AUTH_BASE: &str = "https://login.tado.com";
pub const PASSWORD_AUTH_BASE: &str = "https://auth.tado.com";
pub const API_BASE: &str = "https://my.tado.com/api/v2";
pub const DEFAULT_CLIENT_ID: &str = "1bb50063-6b0c-4d11-bd99-387f4a91cc46";
pub const DEFAULT_SCOPE: &str = "offline_access";
pub const DEFAULT_OUT: &str = "/tmp/tado-refresh.json";
pub const DEFAULT_PASSWORD_FILE: &str = "/tmp/tado.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Device,
    Password,
}

#[derive(Debug, Clone)]
pub struct TadoOptions {
    pub mode: Mode,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub out: PathBuf,
    pub open_browser: bool,
    pub auth_base: String,
    pub api_base: String,
    pub username: String,
    pub password: String,
    pub password_file: PathBuf,
    /// Upper bound on device-code polling, on top of the advertised expiry.
    pub poll_ceiling: Option<Duration>,
}

impl Default for TadoOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Device,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: String::new(),
            scope: DEFAULT_SCOPE.to_string(),
            out: PathBuf::from(DEFAULT_OUT),
            open_browser: true,
            auth_base: DEVICE_AUTH_BASE.to_string(),
            api_base: API_BASE.to_string(),
            username: String::new(),
            password: String::new(),
            password_file: PathBuf::from(DEFAULT_PASSWORD_FILE),
            poll_ceiling: None,
        }
    }
}

impl TadoOptions {
    /// The password grant lives on a different host; switch to it unless the
    /// caller picked a base explicitly.
    pub fn effective_auth_base(&self) -> &str {
        let base = match self.mode {
            Mode::Password if self.auth_base == DEVICE_AUTH_BASE => PASSWORD_AUTH_BASE,
            _ => self.auth_base.as_str(),
        };
        base.trim_end_matches('/')
    }

    /// Flag values when both are set, otherwise the password file.
    pub fn resolve_login(&self) -> Result<(String, String), AuthError> {
        if !self.username.is_empty() && !self.password.is_empty() {
            return Ok((self.username.clone(), self.password.clone()));
        }
        read_password_file(&self.password_file)
    }
}

#[derive(Debug, Clone)]
pub struct TadoOutcome {
    pub record: CredentialRecord,
    /// `None` when there was no access token or the lookup failed.
    pub home_ids: Option<Vec<String>>,
}

pub async fn run(opts: &TadoOptions) -> Result<TadoOutcome, AuthError> {
    let client = build_client(TADO_HTTP_TIMEOUT)?;

    let token = match opts.mode {
        Mode::Password => password_login(&client, opts).await?,
        Mode::Device => device_login(&client, opts).await?,
    };

    let refresh_token = token.require_refresh_token("no refresh_token returned")?;
    let record = CredentialRecord {
        client_id: opts.client_id.clone(),
        client_secret: String::new(),
        refresh_token,
        scope: opts.scope.clone(),
    };
    write_credentials(&opts.out, &record, FileLayout::Tado)?;
    println!("Wrote refresh token JSON to {}", opts.out.display());

    let home_ids = match token.access_token() {
        Some(access_token) => report_homes(&client, &opts.api_base, access_token).await,
        None => None,
    };

    Ok(TadoOutcome { record, home_ids })
}

async fn password_login(
    client: &reqwest::Client,
    opts: &TadoOptions,
) -> Result<TokenResponse, AuthError> {
    let (username, password) = opts.resolve_login()?;
    let token_url = format!("{}/oauth2/token", opts.effective_auth_base());
    password_grant(
        client,
        &token_url,
        &opts.client_id,
        &opts.client_secret,
        &username,
        &password,
        &opts.scope,
    )
    .await
}

async fn device_login(
    client: &reqwest::Client,
    opts: &TadoOptions,
) -> Result<TokenResponse, AuthError> {
    let base = opts.effective_auth_base();
    let auth = request_device_code(
        client,
        &format!("{base}/oauth2/device_authorize"),
        &opts.client_id,
        &opts.scope,
    )
    .await?;

    let url = auth.display_uri();
    println!("Open this URL to authorize Tado:");
    println!("{}", url.unwrap_or_default());
    println!();
    if let Some(user_code) = auth.user_code.as_deref().filter(|c| !c.is_empty()) {
        println!("User code: {user_code}");
    }
    println!();

    if let Some(url) = url.filter(|_| opts.open_browser) {
        browser::open_best_effort(url);
    }

    let mut settings = auth.poll_settings();
    if let Some(ceiling) = opts.poll_ceiling {
        settings = settings.with_ceiling(ceiling);
    }
    poll_for_token(
        client,
        &format!("{base}/oauth2/token"),
        &opts.client_id,
        &auth.device_code,
        settings,
    )
    .await
}

/// Print the account's home IDs. Failures only warn: the refresh token is
/// already on disk.
async fn report_homes(
    client: &reqwest::Client,
    api_base: &str,
    access_token: &str,
) -> Option<Vec<String>> {
    match fetch_home_ids(client, api_base, access_token).await {
        Ok(ids) => {
            if ids.is_empty() {
                println!("No homes returned from /me");
            } else {
                println!("Home IDs: {}", ids.join(", "));
            }
            Some(ids)
        }
        Err(e) => {
            tracing::warn!(code = e.code(), "account lookup failed: {e}");
            println!("Warning: failed to query /me: {e}");
            None
        }
    }
}
