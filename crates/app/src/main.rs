use chrono::TimeDelta;
use migration::{Migrator, MigratorTrait};
use settings::Database;

use std::net::{IpAddr, SocketAddr};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expenses={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let ttl = TimeDelta::try_seconds(settings.auth.token_ttl_secs)
        .ok_or("auth.token_ttl_secs is out of range")?;
    let tokens = server::TokenKeys::new(&settings.auth.secret, ttl);

    let bind: IpAddr = settings.server.bind.parse()?;
    let addr = SocketAddr::new(bind, settings.server.port);

    let db = parse_database(&settings.server.database()).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, tokens, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
