use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use labline::bot::Router;
use labline::config::AppConfig;
use labline::geocode::{Geocoder, HttpGeocoder, NoopGeocoder};
use labline::line::LineClient;
use labline::repo::{CsvBookingRepository, CsvUserRepository};
use labline::report::LogReporter;
use labline::session::SessionStore;
use labline::state::AppState;
use labline::webhook;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting LabLine booking bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    let store = Arc::new(SessionStore::new());
    let users = Arc::new(CsvUserRepository::new(&config.data_dir)?);
    let bookings = Arc::new(CsvBookingRepository::new(&config.data_dir)?);

    let geocoder: Arc<dyn Geocoder> = match &config.geocoder_api_key {
        Some(api_key) => Arc::new(HttpGeocoder::new(
            config.geocoder_endpoint.clone(),
            api_key.clone(),
            config.http_timeout,
        )?),
        None => {
            info!("No geocoder API key configured; coordinates come from location shares only");
            Arc::new(NoopGeocoder::new())
        }
    };

    let router = Arc::new(Router::new(
        store,
        users,
        bookings,
        geocoder,
        Arc::new(LogReporter::new()),
    ));
    let sender = Arc::new(LineClient::new(
        config.channel_access_token.clone(),
        config.http_timeout,
    )?);

    let state = AppState::new(config.channel_secret.clone(), router, sender);
    let app = webhook::routes(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    info!(address = %bind_address, "Webhook server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
