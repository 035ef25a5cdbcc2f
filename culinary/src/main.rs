use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use culinary::{config::Args, routes, state::AppState, store};
use culinary_core::gateway::DocumentGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("culinary={0},tower_http={0}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting culinary backend...");

    let gateway = match store::connect(&args).await {
        Ok(gateway) => gateway,
        Err(e) => {
            error!("Store initialization failed: {e}");
            DocumentGateway::disconnected()
        }
    };

    let state = AppState::new(gateway.clone())
        .with_database(args.database_name.clone(), args.database_url.is_some());
    let app = routes::router(state);

    let addr = args.listen_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    gateway.shutdown().await?;
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}
