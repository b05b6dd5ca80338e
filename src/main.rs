use gemini_accounts::{AccountStore, Config};
use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database = cfg.database_url.is_some(),
        loglevel = %cfg.loglevel
    );

    let store = AccountStore::connect(cfg.database_url.as_deref()).await?;

    let active = store.fetch_active_accounts().await?;
    info!(active = active.len(), "account pool ready");

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    store.disconnect().await;
    Ok(())
}
