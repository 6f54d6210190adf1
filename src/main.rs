//! Dive Schedule dashboard
//!
//! With the `server` feature this is the axum process: JSON API plus the
//! built web client as static files. Without it (`dx build --features web
//! --no-default-features`) it is the WASM entry point for the Dioxus UI.

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;

    use dive_schedule::{api, config, gateway};
    use tower_http::services::{ServeDir, ServeFile};
    use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "dive_schedule=debug,tower_http=debug,axum::rejection=trace".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Dive Schedule");

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(
        port = config.port,
        mode = ?config.backend.mode,
        static_dir = %config.static_dir.display(),
        "Configuration loaded"
    );

    let backend = gateway::from_config(&config.backend)?;

    // Client-side routes all resolve to the app shell
    let static_files = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    let app = api::router(api::AppState::new(backend))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(dive_schedule::app::App);
}
