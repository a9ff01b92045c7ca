use std::env;

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roomlink_backend::services::accounts;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roomlink_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: cargo run --bin create_admin <username> <email> <password>");
        eprintln!("Example: cargo run --bin create_admin admin admin@roomlink.test s3cret!");
        std::process::exit(1);
    }

    let bcrypt_cost: u32 = env::var("BCRYPT_COST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    // Connect to database
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    migration::Migrator::up(&db, None).await?;

    let admin = accounts::create_admin(&db, bcrypt_cost, &args[1], &args[2], &args[3]).await?;

    tracing::info!(admin_id = admin.id, email = %admin.email, "Admin account ready");
    Ok(())
}
