use std::sync::Arc;

use storefront_app::{build_router, with_uploads, AppState};
use storefront_catalog::MIGRATOR;
use storefront_core::{AppConfig, StorefrontConfig};
use storefront_data_sqlx::connect_sqlite;
use storefront_security::{JwtClaimsValidator, SecurityConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    storefront_core::init_tracing();

    let config = AppConfig::load("dev")?.with_typed::<StorefrontConfig>()?;

    let secret = config
        .security
        .jwt_secret
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or("security.jwt_secret (SECURITY_JWT_SECRET) must be set")?;
    let validator = JwtClaimsValidator::from_secret(
        secret.as_bytes(),
        SecurityConfig::new(&config.security.issuer, &config.security.audience),
    );

    let pool = connect_sqlite(&config.database.url, config.database.max_connections).await?;
    MIGRATOR.run(&pool).await?;
    tracing::info!("migrations applied");

    let state = AppState::new(pool, &config, Arc::new(validator));
    let app = with_uploads(
        build_router(state),
        &config.media.upload_dir,
        &config.media.public_base_url,
    );

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, profile = config.profile(), "storefront listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown requested");
}
