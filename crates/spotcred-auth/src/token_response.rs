use serde::{Deserialize, Serialize};

/// Body of a successful token endpoint response. `refresh_token` is absent
/// when Spotify has already issued one for this user/app pair.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
}
