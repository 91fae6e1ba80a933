use crate::config::AuthConfig;
use crate::error::FlowResult;
use url::Url;

pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Build the URL the user's browser visits to grant consent.
/// https://developer.spotify.com/documentation/web-api/tutorials/code-flow
pub fn authorize_url(config: &AuthConfig) -> FlowResult<Url> {
    let redirect_uri = config.redirect_uri();
    let url = Url::parse_with_params(
        SPOTIFY_AUTH_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
        ],
    )?;
    Ok(url)
}
