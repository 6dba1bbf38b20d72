use std::sync::Arc;

use crate::config::AppConfig;
use crate::rpc::RpcClient;

/// One declared client per backend service, each holding its own
/// persistent connection.
#[derive(Clone)]
pub struct GatewayState {
    pub auth: Arc<RpcClient>,
    pub users: Arc<RpcClient>,
    pub recipes: Arc<RpcClient>,
}

impl GatewayState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            auth: Arc::new(RpcClient::new("auth", config.auth_service.addr())),
            users: Arc::new(RpcClient::new("users", config.users_service.addr())),
            recipes: Arc::new(RpcClient::new("recipe", config.recipe_service.addr())),
        }
    }

    /// Wires the state to explicit addresses; used by tests with stub
    /// services on ephemeral ports.
    pub fn from_addrs(auth: String, users: String, recipes: String) -> Self {
        Self {
            auth: Arc::new(RpcClient::new("auth", auth)),
            users: Arc::new(RpcClient::new("users", users)),
            recipes: Arc::new(RpcClient::new("recipe", recipes)),
        }
    }
}
