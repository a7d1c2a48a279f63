use dotenvy::dotenv;
use studio_billing::config;
use studio_billing::errors::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load billing policy configuration
    let billing_config = config::billing::load_default_config()?;
    info!(
        tax_rate = billing_config.tax_rate,
        unbilled_policy = ?billing_config.unbilled_policy,
        "Loaded billing configuration."
    );

    // 4. Connect and make sure the schema exists
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    info!("studio-billing ready.");
    Ok(())
}
