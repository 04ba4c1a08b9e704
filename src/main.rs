use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use visited_embed::config::Settings;
use visited_embed::logging;
use visited_embed::server::router::router;
use visited_embed::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    logging::init(&settings.server.log_dir);

    let bind_addr = settings.bind_addr();
    let state = AppState::initialize(settings)?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
