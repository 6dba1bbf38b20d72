use forkful::config::AppConfig;
use forkful::gateway::{self, GatewayState};
use forkful::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("forkful=debug,axum=info,tower_http=info");

    let config = AppConfig::from_env()?;
    let state = GatewayState::from_config(&config);
    tracing::info!(
        auth = %config.auth_service.addr(),
        users = %config.users_service.addr(),
        recipes = %config.recipe_service.addr(),
        "backend services declared"
    );

    let app = gateway::build_router(state);
    gateway::serve(app).await
}
