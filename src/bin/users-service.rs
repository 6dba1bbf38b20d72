use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use forkful::config::AppConfig;
use forkful::logging;
use forkful::rpc;
use forkful::users::service::UsersService;

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

    let service = Arc::new(UsersService::new(db));

    let addr = format!("0.0.0.0:{}", config.users_service.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    rpc::server::serve(listener, service).await
}
