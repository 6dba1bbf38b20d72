use async_trait::async_trait;
use serde_json::Value;

use crate::auth::dto::{
    ChangePasswordRequest, LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest,
    ValidateTokenRequest,
};
use crate::auth::service::AuthService;
use crate::error::AppError;
use crate::patterns;
use crate::rpc::server::{parse_payload, to_value, unknown_cmd, Handler};

#[async_trait]
impl Handler for AuthService {
    async fn handle(&self, cmd: &str, payload: Value) -> Result<Value, AppError> {
        match cmd {
            patterns::auth::REGISTER => {
                let req: RegisterRequest = parse_payload(payload)?;
                to_value(self.register(req).await?)
            }
            patterns::auth::LOGIN => {
                let req: LoginRequest = parse_payload(payload)?;
                to_value(self.login(req).await?)
            }
            patterns::auth::REFRESH_TOKEN => {
                let req: RefreshRequest = parse_payload(payload)?;
                to_value(self.refresh_token(req).await?)
            }
            patterns::auth::LOGOUT => {
                let req: LogoutRequest = parse_payload(payload)?;
                self.logout(req.user_id);
                Ok(Value::Null)
            }
            patterns::auth::CHANGE_PASSWORD => {
                let req: ChangePasswordRequest = parse_payload(payload)?;
                self.change_password(req).await?;
                Ok(Value::Null)
            }
            patterns::auth::VALIDATE_TOKEN => {
                let req: ValidateTokenRequest = parse_payload(payload)?;
                to_value(self.validate_token(&req.token).await?)
            }
            other => Err(unknown_cmd(other)),
        }
    }
}
