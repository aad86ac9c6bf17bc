/*
 * Equalizer Exchange yield adaptor
 * Runs the adaptor once and prints the result list as JSON
 */

use equalizer_yield::{config::Config, service::YieldService};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Equalizer yield adaptor");

    let config = Config::from_env();
    let service = YieldService::new(config);

    let pools = service.fetch_pool_yields().await;
    info!("Computed yields for {} pools", pools.len());

    println!("{}", serde_json::to_string_pretty(&pools)?);

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "equalizer_yield=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
