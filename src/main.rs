use std::sync::Arc;

use roomlink_backend::{
    AppState,
    config::AppConfig,
    routes::build_router,
    services::{image_host::CloudinaryHost, payment_gateway::RazorpayGateway},
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roomlink_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let gateway = RazorpayGateway::new(&config.razorpay, config.gateway_timeout)
        .expect("Failed to build payment gateway client");
    let images = CloudinaryHost::new(&config.cloudinary, config.image_host_timeout)
        .expect("Failed to build image host client");

    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        db,
        config: Arc::new(config),
        gateway: Arc::new(gateway),
        images: Arc::new(images),
    };

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
