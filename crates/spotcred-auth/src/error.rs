use reqwest::StatusCode;
use thiserror::Error;

pub type FlowResult<T> = Result<T, AuthFlowError>;

/// Everything that can end a run without a refresh token. None of these are
/// recoverable within a single run; the process reports and exits.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to bind the callback listener on 127.0.0.1:{port}: {source}")]
    Bind {
        port: u16,
        source: std::io::Error,
    },

    #[error("Spotify denied the authorization request: {0}")]
    Denied(String),

    #[error("token endpoint returned {status}: {body}")]
    ExchangeRejected { status: StatusCode, body: String },

    #[error("no refresh_token in Spotify's response (full response: {body})")]
    RefreshTokenMissing { body: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("could not parse the token response: {source} (full response: {body})")]
    MalformedTokenResponse {
        body: String,
        source: serde_json::Error,
    },
}
