//! # mongobnb Binary
//!
//! The entry point that assembles the application based on compile-time features.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mb_api::{configure_routes, AppState};
use mb_config::{LogFormat, LogSettings, Settings};
use mb_core::traits::{BookingNotifier, BookingRepo, ListingRepo};
use mb_notify_webhook::{LogNotifier, WebhookNotifier};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(not(any(feature = "db-mongo", feature = "db-memory")))]
compile_error!("enable a storage backend feature: `db-mongo` or `db-memory`");

type Storage = (Arc<dyn ListingRepo>, Arc<dyn BookingRepo>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_tracing(&settings.log);

    // 1. Initialize storage
    let (listings, bookings) = storage(&settings).await?;

    // 2. Initialize the booking event notifier
    let notifier = notifier(&settings)?;

    // 3. Wrap in AppState (dynamic dispatch keeps handlers backend-agnostic)
    let state = Arc::new(AppState {
        listings,
        bookings,
        notifier,
    });
    let app = configure_routes(state, settings.webhooks.inbound_sms);

    let address = settings.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("mongobnb listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(feature = "db-memory")]
async fn storage(settings: &Settings) -> anyhow::Result<Storage> {
    use mb_db_memory::{MemoryBookingRepo, MemoryListingRepo};

    let listings: Arc<dyn ListingRepo> = Arc::new(
        MemoryListingRepo::load(&settings.database.seed_path)
            .await
            .context("failed to seed in-memory catalog")?,
    );
    let bookings: Arc<dyn BookingRepo> = Arc::new(MemoryBookingRepo::new());
    tracing::warn!("Using in-memory storage: bookings are lost on restart");

    Ok((listings, bookings))
}

#[cfg(all(feature = "db-mongo", not(feature = "db-memory")))]
async fn storage(settings: &Settings) -> anyhow::Result<Storage> {
    use mb_config::ExposeSecret;
    use mb_db_mongo::MongoStore;

    let db = &settings.database;
    let store = MongoStore::connect(db.uri.expose_secret(), &db.name)
        .await
        .context("invalid database configuration")?;
    store.ping().await.context("database unreachable")?;

    let listings: Arc<dyn ListingRepo> = Arc::new(store.listings(&db.listings_collection));
    let bookings: Arc<dyn BookingRepo> = Arc::new(store.bookings(&db.bookings_collection));

    Ok((listings, bookings))
}

fn notifier(settings: &Settings) -> anyhow::Result<Arc<dyn BookingNotifier>> {
    let url = settings
        .notify
        .webhook_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());

    match url {
        Some(url) => {
            let timeout = Duration::from_secs(settings.notify.timeout_secs);
            let notifier = WebhookNotifier::new(url, timeout)
                .context("failed to build webhook client")?;
            info!("Publishing booking events to {url}");
            Ok(Arc::new(notifier))
        }
        None => {
            info!("No webhook configured; booking events are only logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
