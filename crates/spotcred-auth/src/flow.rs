use crate::authorize::authorize_url;
use crate::callback::{AuthorizationResult, CallbackListener};
use crate::config::AuthConfig;
use crate::error::{AuthFlowError, FlowResult};
use crate::exchange::TokenExchanger;
use tracing::{info, warn};

/// Run the whole flow once: validate config, bind the listener, send the user
/// to the consent page, wait for the one redirect, exchange the code.
///
/// The listener is bound before the browser opens so the redirect cannot race
/// the bind. It is consumed by the first request carrying `code` or `error`,
/// even if the exchange afterwards fails; rerun the tool to try again.
pub async fn run(config: &AuthConfig) -> FlowResult<String> {
    config.validate()?;

    let listener = CallbackListener::bind(config.port).await?;

    let auth_url = authorize_url(config)?;
    println!("=====================================================================");
    println!("              Spotify Refresh Token Generator");
    println!("=====================================================================");
    println!();
    println!("STEP 1: Make sure this Redirect URI is registered in your app");
    println!("        settings on the Spotify Developer Dashboard:");
    println!("        {}", config.redirect_uri());
    println!();
    println!("STEP 2: Your browser will now open to authorize this tool.");
    println!("If it doesn't, copy and paste this URL into your browser:");
    println!();
    println!("{auth_url}");
    println!();

    // Best effort; the printed URL covers the manual fallback.
    if let Err(e) = open::that(auth_url.as_str()) {
        warn!("Could not open the browser ({e}); use the URL printed above");
    }

    info!("Waiting for Spotify to redirect to {} ...", config.redirect_uri());
    match listener.wait_for_redirect().await? {
        AuthorizationResult::Code(code) => {
            info!("Authorization code received, exchanging it for tokens");
            TokenExchanger::new().exchange(config, &code).await
        }
        AuthorizationResult::Denied(cause) => Err(AuthFlowError::Denied(cause)),
    }
}
