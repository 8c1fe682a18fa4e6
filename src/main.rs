use tracing_subscriber::EnvFilter;
use transport_search::Config;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().inspect_err(|e| {
        tracing::error!("config: {e}. Check AUTH_SERVER_URL, APP_BASE_URL and PORT.");
    })?;

    config.log();

    transport_search::server::serve(config).await?;

    Ok(())
}
