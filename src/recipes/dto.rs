use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::repo::{Recipe, RecipeWithAuthorRow};

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Page {
    /// Requested page size clamped to a sane range; `?limit=-1` must never
    /// reach the database as a negative LIMIT.
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    pub query: String,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug, Deserialize)]
pub struct IdPayload {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SlugPayload {
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByAuthorPayload {
    pub author_id: Uuid,
    #[serde(flatten)]
    pub page: Page,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipePayload {
    pub author_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: String,
    pub servings: i32,
    pub image: String,
    #[serde(default)]
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub instructions: Option<Vec<String>>,
    #[serde(default)]
    pub cooking_time: Option<String>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipePayload {
    pub id: Uuid,
    pub author_id: Uuid,
    #[serde(flatten)]
    pub fields: UpdateRecipeFields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecipePayload {
    pub id: Uuid,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: String,
    pub servings: i32,
    pub image: String,
    pub is_published: bool,
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Recipe> for RecipeView {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            slug: r.slug,
            name: r.name,
            description: r.description,
            ingredients: r.ingredients,
            instructions: r.instructions,
            cooking_time: r.cooking_time,
            servings: r.servings,
            image: r.image,
            is_published: r.is_published,
            author_id: r.author_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInfo {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeWithAuthor {
    #[serde(flatten)]
    pub recipe: RecipeView,
    pub author: AuthorInfo,
}

impl From<RecipeWithAuthorRow> for RecipeWithAuthor {
    fn from(row: RecipeWithAuthorRow) -> Self {
        Self {
            author: AuthorInfo {
                id: row.author_id,
                username: row.author_username,
                first_name: row.author_first_name,
                last_name: row.author_last_name,
            },
            recipe: RecipeView {
                id: row.id,
                slug: row.slug,
                name: row.name,
                description: row.description,
                ingredients: row.ingredients,
                instructions: row.instructions,
                cooking_time: row.cooking_time,
                servings: row.servings,
                image: row.image,
                is_published: row.is_published,
                author_id: row.author_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn second_page_skips_exactly_one_batch() {
        let page: Page = serde_json::from_value(json!({ "page": 2, "limit": 5 })).expect("page");
        assert_eq!(page.offset(), 5);
    }

    #[test]
    fn negative_limit_is_clamped() {
        let page: Page = serde_json::from_value(json!({ "page": 1, "limit": -1 })).expect("page");
        assert_eq!(page.limit(), 1);
        assert_eq!(page.offset(), 0);
    }
}
