use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::patterns;
use crate::rpc::server::{parse_payload, to_value, unknown_cmd, Handler};
use crate::users::dto::{
    CreateUserPayload, DeactivateUserPayload, EmailPayload, IdPayload, Page, SearchPayload,
    UpdateUserPayload, UsernamePayload,
};
use crate::users::service::UsersService;

#[async_trait]
impl Handler for UsersService {
    async fn handle(&self, cmd: &str, payload: Value) -> Result<Value, AppError> {
        match cmd {
            patterns::users::CREATE => {
                let req: CreateUserPayload = parse_payload(payload)?;
                to_value(self.create_user(req).await?)
            }
            patterns::users::FIND_ALL => {
                let page: Page = parse_payload(payload)?;
                to_value(self.find_all_users(page.limit(), page.offset()).await?)
            }
            patterns::users::FIND_BY_ID => {
                let req: IdPayload = parse_payload(payload)?;
                to_value(self.find_user_by_id(req.id).await?)
            }
            patterns::users::FIND_BY_EMAIL => {
                let req: EmailPayload = parse_payload(payload)?;
                to_value(self.find_user_by_email(&req.email).await?)
            }
            patterns::users::FIND_BY_USERNAME => {
                let req: UsernamePayload = parse_payload(payload)?;
                to_value(self.find_user_by_username(&req.username).await?)
            }
            patterns::users::UPDATE => {
                let req: UpdateUserPayload = parse_payload(payload)?;
                to_value(self.update_user(req.id, req.caller_id, req.fields).await?)
            }
            patterns::users::DEACTIVATE => {
                let req: DeactivateUserPayload = parse_payload(payload)?;
                self.deactivate_user(req.id, req.caller_id).await?;
                Ok(Value::Null)
            }
            patterns::users::SEARCH => {
                let req: SearchPayload = parse_payload(payload)?;
                to_value(
                    self.search_users(&req.query, req.page.limit(), req.page.offset())
                        .await?,
                )
            }
            patterns::users::GET_PROFILE => {
                let req: IdPayload = parse_payload(payload)?;
                to_value(self.get_user_profile(req.id).await?)
            }
            other => Err(unknown_cmd(other)),
        }
    }
}
