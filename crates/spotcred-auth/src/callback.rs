use crate::error::AuthFlowError;
use crate::error::FlowResult;
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tracing::debug;
use tracing::error;
use url::Url;

/// What the single relevant redirect carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResult {
    /// Authorization code, ready to be exchanged for tokens.
    Code(String),
    /// Spotify's error code, e.g. `access_denied`.
    Denied(String),
}

/// Single-use local listener for the authorization redirect.
#[derive(Debug)]
pub struct CallbackListener {
    listener: TcpListener,
}

impl CallbackListener {
    pub async fn bind(port: u16) -> FlowResult<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|source| AuthFlowError::Bind { port, source })?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve connections one at a time until a request carrying a `code` or
    /// `error` query parameter arrives; that one interaction consumes the
    /// listener. Anything else (favicon probes, stray paths) gets a 404 and
    /// the loop keeps waiting.
    pub async fn wait_for_redirect(&self) -> FlowResult<AuthorizationResult> {
        loop {
            let (mut socket, peer) = self.listener.accept().await?;
            debug!("Connection from {peer}");

            let mut buffer = [0u8; 2048];
            let n = socket.read(&mut buffer).await?;
            if n == 0 {
                continue;
            }
            let request = String::from_utf8_lossy(&buffer[..n]);

            match parse_redirect(&request) {
                Some(AuthorizationResult::Code(code)) => {
                    respond(&mut socket, "200 OK", SUCCESS_PAGE).await?;
                    return Ok(AuthorizationResult::Code(code));
                }
                Some(AuthorizationResult::Denied(cause)) => {
                    error!("Spotify returned an error: {cause}");
                    respond(&mut socket, "400 Bad Request", &error_page(&cause)).await?;
                    return Ok(AuthorizationResult::Denied(cause));
                }
                None => {
                    respond(&mut socket, "404 Not Found", "").await?;
                }
            }
        }
    }
}

/// Pull `code` or `error` out of the request target's query string.
/// Returns None for requests that are not the redirect we are waiting for.
fn parse_redirect(request: &str) -> Option<AuthorizationResult> {
    let target = request.split_whitespace().nth(1)?;
    let url = Url::parse(&format!("http://localhost{target}")).ok()?;

    if let Some((_, code)) = url.query_pairs().find(|(k, _)| k == "code") {
        return Some(AuthorizationResult::Code(code.into_owned()));
    }
    if let Some((_, cause)) = url.query_pairs().find(|(k, _)| k == "error") {
        return Some(AuthorizationResult::Denied(cause.into_owned()));
    }
    None
}

async fn respond(socket: &mut TcpStream, status: &str, body: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.flush().await?;
    Ok(())
}

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="UTF-8"><title>Success!</title></head>
  <body style="font-family:sans-serif;text-align:center;background-color:#1DB954;color:white;padding-top:3em">
    <h1>Authentication Successful!</h1>
    <p>Please return to your terminal to get the refresh token.</p>
  </body>
</html>
"#;

fn error_page(cause: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="UTF-8"><title>Error</title></head>
  <body style="font-family:sans-serif;text-align:center;padding-top:3em">
    <h1>Error: {cause}</h1>
    <p>Authorization did not complete. Check the terminal for details.</p>
  </body>
</html>
"#
    )
}
