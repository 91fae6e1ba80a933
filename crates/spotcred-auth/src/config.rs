use crate::error::{AuthFlowError, FlowResult};

pub const DEFAULT_PORT: u16 = 8888;

/// The scopes the downstream device needs. Overridable with SPOTIFY_SCOPE.
pub const DEFAULT_SCOPE: &str = "ugc-image-upload playlist-read-collaborative playlist-modify-private playlist-modify-public playlist-read-private user-read-playback-position user-read-recently-played user-top-read user-modify-playback-state user-read-currently-playing user-read-playback-state user-read-private user-read-email user-library-modify user-library-read user-follow-modify user-follow-read streaming app-remote-control";

const PLACEHOLDER_CLIENT_ID: &str = "your_spotify_client_id";
const PLACEHOLDER_CLIENT_SECRET: &str = "your_spotify_client_secret";

const DASHBOARD_URL: &str = "https://developer.spotify.com/dashboard/";

/// Inputs for one authorization run. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub port: u16,
    /// Space-delimited scope list, passed through to the authorize URL as-is.
    pub scope: String,
}

impl AuthConfig {
    /// Load from the environment (a local `.env` file is honored).
    pub fn from_env() -> FlowResult<Self> {
        dotenvy::dotenv().ok();

        let client_id = var("SPOTIFY_CLIENT_ID")?;
        let client_secret = var("SPOTIFY_CLIENT_SECRET")?;
        let port = match std::env::var("SPOTIFY_CALLBACK_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AuthFlowError::Config(format!(
                    "SPOTIFY_CALLBACK_PORT must be a port number, got {raw:?}"
                ))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        let scope =
            std::env::var("SPOTIFY_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string());

        Ok(Self {
            client_id,
            client_secret,
            port,
            scope,
        })
    }

    /// The redirect target the listener serves. This exact URI must be
    /// registered in the app settings on the Spotify developer dashboard.
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/callback", self.port)
    }

    /// Reject empty or placeholder credentials before any bind or network
    /// activity happens.
    pub fn validate(&self) -> FlowResult<()> {
        if self.client_id.is_empty() || self.client_id == PLACEHOLDER_CLIENT_ID {
            return Err(AuthFlowError::Config(format!(
                "SPOTIFY_CLIENT_ID is not set; paste your app's client id from {DASHBOARD_URL}"
            )));
        }
        if self.client_secret.is_empty() || self.client_secret == PLACEHOLDER_CLIENT_SECRET {
            return Err(AuthFlowError::Config(format!(
                "SPOTIFY_CLIENT_SECRET is not set; paste your app's client secret from {DASHBOARD_URL}"
            )));
        }
        Ok(())
    }
}

fn var(name: &str) -> FlowResult<String> {
    std::env::var(name).map_err(|_| {
        AuthFlowError::Config(format!(
            "missing env var {name}; get the value from {DASHBOARD_URL}"
        ))
    })
}
