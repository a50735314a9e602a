use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use homeauth::credentials::{load_client_credentials, ClientCredentials};
use homeauth::flows::daikin::{
    self, DEFAULT_AUTHORIZE_URL, DEFAULT_OUT, DEFAULT_REDIRECT_URI, DEFAULT_SCOPE,
    DEFAULT_TOKEN_URL,
};
use homeauth::{AuthError, DaikinOptions};

#[derive(Parser)]
#[command(
    name = "daikin-auth",
    version,
    about = "Daikin Onecta OAuth helper (authorization code flow)"
)]
struct Cli {
    /// Daikin client ID
    #[arg(long, env = "DAIKIN_CLIENT_ID", default_value = "")]
    client_id: String,

    /// Daikin client secret
    #[arg(long, env = "DAIKIN_CLIENT_SECRET", default_value = "")]
    client_secret: String,

    /// JSON or YAML file with client_id/client_secret
    #[arg(long, env = "DAIKIN_CREDENTIALS_FILE")]
    credentials_file: Option<PathBuf>,

    /// OAuth scope
    #[arg(long, default_value = DEFAULT_SCOPE)]
    scope: String,

    /// Authorize URL
    #[arg(long, default_value = DEFAULT_AUTHORIZE_URL)]
    authorize_url: String,

    /// Token URL
    #[arg(long, default_value = DEFAULT_TOKEN_URL)]
    token_url: String,

    /// Redirect URI; the callback listener binds to its host and port
    #[arg(long, default_value = DEFAULT_REDIRECT_URI)]
    redirect_uri: String,

    /// Output path for refresh token JSON
    #[arg(long, default_value = DEFAULT_OUT)]
    out: PathBuf,

    /// Do not open the browser automatically
    #[arg(long)]
    no_open: bool,

    /// Seconds to wait for authorization
    #[arg(long, default_value_t = 300)]
    timeout: u64,
}

#[tokio::main]
async fn main() {
    homeauth::logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(code = e.code(), "run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AuthError> {
    let mut creds = ClientCredentials {
        client_id: cli.client_id.trim().to_string(),
        client_secret: cli.client_secret.trim().to_string(),
        scope: cli.scope.trim().to_string(),
        ..Default::default()
    };
    if let Some(path) = &cli.credentials_file {
        if creds.client_id.is_empty() || creds.client_secret.is_empty() {
            creds.fill_from(&load_client_credentials(path)?);
        }
    }
    if creds.scope.is_empty() {
        creds.scope = DEFAULT_SCOPE.to_string();
    }

    let opts = DaikinOptions {
        client_id: creds.client_id,
        client_secret: creds.client_secret,
        scope: creds.scope,
        authorize_url: cli.authorize_url,
        token_url: cli.token_url,
        redirect_uri: cli.redirect_uri,
        out: cli.out,
        timeout: Duration::from_secs(cli.timeout),
    };

    daikin::run(opts, !cli.no_open).await?;
    Ok(())
}
