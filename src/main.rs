use crowdfund_backend::api::{self, AppState};
use crowdfund_backend::config::Config;
use crowdfund_backend::database::{self, ledger::PgLedger, PoolConfig};
use crowdfund_backend::identity::AuthApiIdentity;
use crowdfund_backend::payments::providers::PaystackProvider;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Starting crowdfund backend");
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!("Payment currency: {}", config.payments.currency);

    let pool = database::connect(
        &config.database.url,
        &PoolConfig::from(&config.database),
    )
    .await?;

    let ledger = Arc::new(PgLedger::new(pool));
    let gateway = Arc::new(PaystackProvider::new(config.gateway.clone())?);
    let identity = Arc::new(AuthApiIdentity::new(&config.auth)?);

    let state = AppState::new(&config, ledger, gateway, identity)?;
    let app = api::router(state);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
