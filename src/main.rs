use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hls_vod::app::create_app;
use hls_vod::cli::Args;
use hls_vod::config::settings::AppConfig;
use hls_vod::state::AppState;
use hls_vod::workers::thumbnailer::start_thumbnail_worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let args = Args::parse();
    let config = AppConfig::new(&args).context("invalid configuration")?;

    let state = AppState::new(config);
    state
        .coordinator
        .catalog()
        .ensure_dir()
        .await
        .with_context(|| format!("failed to create media dir {}", state.config.media_dir.display()))?;
    for dir in [&state.config.hls_dir, &state.config.thumbnail_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    info!("📂 Serving media from {}", state.config.media_dir.display());
    if state.config.hwaccel {
        info!("🚀 Hardware encoding enabled");
    }

    tokio::spawn(start_thumbnail_worker(state.clone()));

    let port = state.config.server_port;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!("Server running on http://0.0.0.0:{}", port);
    info!("📖 Swagger UI at http://0.0.0.0:{}/swagger-ui", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down...");
}
