use dotenvy::dotenv;
use scholaris::logging::init_tracing;
use scholaris::router::init_router;
use scholaris::state::AppState;
use scholaris_config::ServerConfig;
use scholaris_core::verify_registry;
use scholaris_db::{DatabaseConfig, init_db_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guard = init_tracing()?;

    if let Err(e) = verify_registry() {
        tracing::error!(error = %e, "Permission registry is inconsistent");
        return Err(e);
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let state = AppState::from_env(pool);
    if state.jwt_config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set, falling back to the development secret");
    }
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(%address, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await?;
    Ok(())
}
