use axum::ServiceExt;
use rusty_library_catalog::{
    adapters::in_memory::{CatalogStore as InMemoryCatalogStore, sample_books},
    api::{handlers::AppState, router::ENDPOINTS, router::create_app},
    application::catalog::ServiceDependencies,
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "rusty_library_catalog={},tower_http=debug",
                    config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize adapters
    let catalog_store = if config.catalog.seed {
        let books = sample_books();
        tracing::info!("Seeding catalog with {} books", books.len());
        Arc::new(InMemoryCatalogStore::with_books(books))
    } else {
        Arc::new(InMemoryCatalogStore::new())
    };

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps: ServiceDependencies::new(catalog_store),
    });

    let app = create_app(app_state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Available endpoints:");
    for (method, path) in ENDPOINTS {
        tracing::info!("  {:<6} {}", method, path);
    }

    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .await?;

    Ok(())
}
