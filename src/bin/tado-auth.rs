use std::path::PathBuf;

use clap::Parser;
use homeauth::flows::tado::{
    self, API_BASE, DEFAULT_CLIENT_ID, DEFAULT_OUT, DEFAULT_PASSWORD_FILE, DEFAULT_SCOPE,
    DEVICE_AUTH_BASE,
};
use homeauth::{AuthError, Mode, TadoOptions};

#[derive(Parser)]
#[command(
    name = "tado-auth",
    version,
    about = "Tado OAuth helper (device or password grant)"
)]
struct Cli {
    /// Grant to use
    #[arg(long, value_enum, default_value_t = Mode::Device)]
    mode: Mode,

    /// OAuth client ID
    #[arg(long, env = "TADO_CLIENT_ID", default_value = DEFAULT_CLIENT_ID)]
    client_id: String,

    /// OAuth client secret (password mode only)
    #[arg(long, env = "TADO_CLIENT_SECRET", default_value = "")]
    client_secret: String,

    /// OAuth scope
    #[arg(long, default_value = DEFAULT_SCOPE)]
    scope: String,

    /// Output path for refresh token JSON
    #[arg(long, default_value = DEFAULT_OUT)]
    out: PathBuf,

    /// Do not open the browser automatically
    #[arg(long)]
    no_open: bool,

    /// Authorization server base URL
    #[arg(long, default_value = DEVICE_AUTH_BASE)]
    auth_base: String,

    /// API base URL used for the account lookup
    #[arg(long, default_value = API_BASE)]
    api_base: String,

    /// Account username (password mode)
    #[arg(long, env = "TADO_USERNAME", default_value = "")]
    username: String,

    /// Account password (password mode)
    #[arg(long, env = "TADO_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// File with username on line 1 and password on line 2
    #[arg(long, default_value = DEFAULT_PASSWORD_FILE)]
    password_file: PathBuf,
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
    let opts = TadoOptions {
        mode: cli.mode,
        client_id: cli.client_id,
        client_secret: cli.client_secret,
        scope: cli.scope,
        out: cli.out,
        open_browser: !cli.no_open,
        auth_base: cli.auth_base,
        api_base: cli.api_base,
        username: cli.username,
        password: cli.password,
        password_file: cli.password_file,
        poll_ceiling: None,
    };
    tado::run(&opts).await?;
    Ok(())
}
