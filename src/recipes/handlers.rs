use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;
use crate::patterns;
use crate::recipes::dto::{
    ByAuthorPayload, CreateRecipePayload, DeleteRecipePayload, IdPayload, Page, SearchPayload,
    SlugPayload, UpdateRecipePayload,
};
use crate::recipes::service::RecipeService;
use crate::rpc::server::{parse_payload, to_value, unknown_cmd, Handler};

#[async_trait]
impl Handler for RecipeService {
    async fn handle(&self, cmd: &str, payload: Value) -> Result<Value, AppError> {
        match cmd {
            patterns::recipes::CREATE => {
                let req: CreateRecipePayload = parse_payload(payload)?;
                to_value(self.create_recipe(req).await?)
            }
            patterns::recipes::FIND_ALL => {
                let page: Page = parse_payload(payload)?;
                to_value(self.find_all_recipes(page.limit(), page.offset()).await?)
            }
            patterns::recipes::FIND_BY_ID => {
                let req: IdPayload = parse_payload(payload)?;
                to_value(self.find_recipe_by_id(req.id).await?)
            }
            patterns::recipes::FIND_BY_SLUG => {
                let req: SlugPayload = parse_payload(payload)?;
                to_value(self.find_recipe_by_slug(&req.slug).await?)
            }
            patterns::recipes::FIND_BY_AUTHOR => {
                let req: ByAuthorPayload = parse_payload(payload)?;
                to_value(
                    self.find_recipes_by_author(req.author_id, req.page.limit(), req.page.offset())
                        .await?,
                )
            }
            patterns::recipes::UPDATE => {
                let req: UpdateRecipePayload = parse_payload(payload)?;
                to_value(self.update_recipe(req.id, req.author_id, req.fields).await?)
            }
            patterns::recipes::DELETE => {
                let req: DeleteRecipePayload = parse_payload(payload)?;
                self.delete_recipe(req.id, req.author_id).await?;
                Ok(Value::Null)
            }
            patterns::recipes::SEARCH => {
                let req: SearchPayload = parse_payload(payload)?;
                to_value(
                    self.search_recipes(&req.query, req.page.limit(), req.page.offset())
                        .await?,
                )
            }
            other => Err(unknown_cmd(other)),
        }
    }
}
