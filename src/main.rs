use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vendorlens::config::Config;
use vendorlens::server::{build_app, serve};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendorlens=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Starting Vendorlens {} on {}",
        vendorlens::VERSION,
        config.address()
    );
    let host = config.host.clone();
    let port = config.port;

    let (state, app) = build_app(config);

    if let Err(e) = state.reload().await {
        tracing::warn!(
            "Could not load subscriptions from {}: {}. Starting with an empty dataset.",
            state.config.source.describe(),
            e
        );
    }

    let (port, handle) = serve(app, &host, port)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", host, port);

    handle.await.expect("Server task panicked");
}
