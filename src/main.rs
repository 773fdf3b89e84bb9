//! Biblioteca Server - Library Catalog and Lending Manager
//!
//! REST API server for the library catalog, built on axum and sqlx.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca_server::{
    api, config::AppConfig, repository::Repository, services::Services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("biblioteca_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json_output() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Biblioteca Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Create repository and services
    let repository = Repository::new(pool);

    // The cascade engine cannot function without the sentinel author
    repository
        .authors
        .ensure_system_author()
        .await
        .expect("Failed to seed the system author");

    let services = Services::new(repository);

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Books (aggregate)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", patch(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        // Authors
        .route("/authors", get(api::authors::list_authors))
        .route("/authors/:id", get(api::authors::get_author))
        .route("/authors/:id", patch(api::authors::rename_author))
        .route("/authors/book/:book_id", post(api::authors::create_author_for_book))
        .route(
            "/authors/:id/book/:book_id",
            delete(api::authors::unlink_author_from_book),
        )
        // Editions
        .route("/editions/book/:book_id", get(api::editions::list_book_editions))
        .route("/editions/book/:book_id", post(api::editions::create_edition))
        .route("/editions/:id", get(api::editions::get_edition))
        .route("/editions/:id", patch(api::editions::update_edition))
        .route("/editions/:id", delete(api::editions::delete_edition))
        // Copies
        .route("/copies/edition/:edition_id", get(api::copies::list_edition_copies))
        .route("/copies/edition/:edition_id", post(api::copies::add_copies))
        .route("/copies/:id", get(api::copies::get_copy))
        .route("/copies/:id/can-remove", get(api::copies::can_remove_copy))
        .route("/copies/:id", delete(api::copies::remove_copy))
        // Loans
        .route("/loans", get(api::loans::list_loans))
        .route("/loans", post(api::loans::create_loan))
        .route("/loans/:id", get(api::loans::get_loan))
        .route(
            "/loans/copy/:copy_id/active",
            get(api::loans::get_active_loan_for_copy),
        )
        .route("/loans/:id", patch(api::loans::update_loan))
        .route("/loans/:id", delete(api::loans::delete_loan))
        // Patrons
        .route("/patrons", get(api::patrons::list_patrons))
        .route("/patrons", post(api::patrons::create_patron))
        .route("/patrons/:id", get(api::patrons::get_patron))
        .route("/patrons/:id", patch(api::patrons::update_patron))
        .route("/patrons/:id", delete(api::patrons::delete_patron))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
