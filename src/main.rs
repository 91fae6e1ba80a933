use spotcred_auth::config::AuthConfig;
use spotcred_auth::flow;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init()?;

    let config = AuthConfig::from_env()?;
    match flow::run(&config).await {
        Ok(refresh_token) => {
            println!();
            println!("=====================================================================");
            println!("SUCCESS! Your Spotify refresh token is ready.");
            println!();
            println!("COPY THE LINE BELOW and paste it into your device configuration:");
            println!("---------------------------------------------------------------------");
            println!("{refresh_token}");
            println!("---------------------------------------------------------------------");
            Ok(())
        }
        Err(e) => {
            println!();
            println!("Process finished, but no refresh token was obtained.");
            Err(e.into())
        }
    }
}

fn init() -> eyre::Result<()> {
    color_eyre::install()?;

    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .without_time()
        .init();

    Ok(())
}
