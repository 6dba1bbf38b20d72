use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use forkful::auth::service::AuthService;
use forkful::auth::tokens::JwtKeys;
use forkful::config::AppConfig;
use forkful::logging;
use forkful::rpc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("forkful=debug");

    let config = AppConfig::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let keys = JwtKeys::new(&config.jwt);
    let service = Arc::new(AuthService::new(db, keys));

    let addr = format!("0.0.0.0:{}", config.auth_service.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    rpc::server::serve(listener, service).await
}
