//! Schema-bootstrap entrypoint: loads configuration, connects to the
//! database, and creates the tables the core operates on.

use solshare::config;
use solshare::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let settings = config::settings::load_default_settings()
        .inspect(|_| info!("Loaded config.toml."))
        .unwrap_or_else(|e| {
            info!("Falling back to default settings: {e}");
            config::settings::Settings::default()
        });
    info!(
        scraper_endpoint = %settings.scraper.endpoint,
        timeout_secs = settings.scraper.timeout_secs,
        "Settings ready."
    );

    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;

    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    Ok(())
}
