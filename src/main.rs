use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use pickup::config::AppConfig;
use pickup::db;
use pickup::handlers;
use pickup::services::municipalities::{GeoApiSource, MunicipalityDirectory};
use pickup::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    tracing::info!("using municipality source {}", config.geoapi_url);
    let municipalities =
        MunicipalityDirectory::new(Box::new(GeoApiSource::new(config.geoapi_url.clone())));

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        municipalities,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
