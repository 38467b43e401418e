//! subtally-server binary entrypoint

use anyhow::Context;
use subtally_core::{logging, Config, Database};
use subtally_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let _guard = logging::init(&config.logging).context("failed to initialize logging")?;

    let db_path = config.database.resolved_path();
    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;
    db.migrate().context("failed to run migrations")?;
    tracing::info!(db_path = %db_path.display(), "Database ready");

    let app = build_router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!("subtally-server listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .await
        .context("server failed")?;

    Ok(())
}
