use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snipman::{create_router, AppState, Config};
use snipman_remote::ResourceSource;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("snipman=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Optional: SNIPMAN_HOST, SNIPMAN_LISTEN_ADDR, SNIPMAN_DB_PATH");
            eprintln!("Optional: SNIPMAN_RESOURCES, SNIPMAN_RUNNER_URL, SNIPMAN_ENFORCE_UNIQUE_NAMES");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Snipman server");
    tracing::info!("Host: {}", config.host);
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Database path: {}", config.db_path.display());
    tracing::info!("Resources: {}", config.resources);

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Database error: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = create_router(state);
    if let ResourceSource::Directory(dir) = &config.resources {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server running at http://{}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
