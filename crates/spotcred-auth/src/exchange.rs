use crate::config::AuthConfig;
use crate::error::{AuthFlowError, FlowResult};
use crate::token_response::TokenResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Performs the one authorization-code-for-tokens POST. No retries.
pub struct TokenExchanger {
    http: reqwest::Client,
    token_url: String,
}

impl TokenExchanger {
    pub fn new() -> Self {
        Self::with_token_url(SPOTIFY_TOKEN_URL)
    }

    /// Point the exchange at a different token endpoint (tests use this).
    pub fn with_token_url(token_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
        }
    }

    /// Exchange the authorization code for a refresh token.
    ///
    /// The redirect URI in the form body must match the one used in the
    /// authorization URL or Spotify rejects the grant. A 2xx response without
    /// a `refresh_token` field is reported with the full body so the operator
    /// can see Spotify's reasoning; it is not a crash.
    pub async fn exchange(&self, config: &AuthConfig, code: &str) -> FlowResult<String> {
        let redirect_uri = config.redirect_uri();
        let response = self
            .http
            .post(&self.token_url)
            .header(
                AUTHORIZATION,
                basic_credential(&config.client_id, &config.client_secret),
            )
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthFlowError::ExchangeRejected { status, body });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|source| AuthFlowError::MalformedTokenResponse {
                body: body.clone(),
                source,
            })?;
        debug!("Access token: len={}", token.access_token.len());
        debug!("Expires in: {}s", token.expires_in);

        match token.refresh_token {
            Some(refresh_token) => Ok(refresh_token),
            None => Err(AuthFlowError::RefreshTokenMissing { body }),
        }
    }
}

impl Default for TokenExchanger {
    fn default() -> Self {
        Self::new()
    }
}

/// `Basic base64(client_id:client_secret)` per RFC 6749 §2.3.1.
pub fn basic_credential(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_credential_encodes_id_and_secret() {
        // base64("abc:xyz")
        assert_eq!(basic_credential("abc", "xyz"), "Basic YWJjOnh5eg==");
    }
}
