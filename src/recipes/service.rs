use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::recipes::dto::{
    CreateRecipePayload, RecipeView, RecipeWithAuthor, UpdateRecipeFields,
};
use crate::recipes::repo;
use crate::recipes::slug::{disambiguate, disambiguate_for_rename, slugify};

pub struct RecipeService {
    db: PgPool,
}

impl RecipeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_recipe(
        &self,
        payload: CreateRecipePayload,
    ) -> Result<RecipeView, AppError> {
        let slug = self.unique_slug(&payload.name, None).await?;
        let recipe = repo::insert(
            &self.db,
            &slug,
            payload.author_id,
            &payload.name,
            payload.description.as_deref(),
            &payload.ingredients,
            &payload.instructions,
            &payload.cooking_time,
            payload.servings,
            &payload.image,
            payload.is_published.unwrap_or(true),
        )
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Recipe slug already exists"))?;

        info!(recipe_id = %recipe.id, slug = %recipe.slug, "recipe created");
        Ok(recipe.into())
    }

    pub async fn find_all_recipes(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeWithAuthor>, AppError> {
        let rows = repo::find_all_published(&self.db, limit, offset)
            .await
            .map_err(internal)?;
        Ok(rows.into_iter().map(RecipeWithAuthor::from).collect())
    }

    pub async fn find_recipe_by_id(&self, id: Uuid) -> Result<RecipeWithAuthor, AppError> {
        let row = repo::find_with_author_by_id(&self.db, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("Recipe with ID {id} not found")))?;
        Ok(row.into())
    }

    pub async fn find_recipe_by_slug(&self, slug: &str) -> Result<RecipeWithAuthor, AppError> {
        let row = repo::find_with_author_by_slug(&self.db, slug)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("Recipe with slug {slug} not found")))?;
        Ok(row.into())
    }

    pub async fn find_recipes_by_author(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeView>, AppError> {
        let rows = repo::find_by_author(&self.db, author_id, limit, offset)
            .await
            .map_err(internal)?;
        Ok(rows.into_iter().map(RecipeView::from).collect())
    }

    pub async fn update_recipe(
        &self,
        id: Uuid,
        author_id: Uuid,
        fields: UpdateRecipeFields,
    ) -> Result<RecipeView, AppError> {
        let existing = repo::find_by_id(&self.db, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("Recipe with ID {id} not found")))?;

        if existing.author_id != author_id {
            return Err(AppError::Forbidden(
                "You can only update your own recipes".into(),
            ));
        }

        // The slug follows the name; an unchanged name keeps the slug stable.
        let slug = match &fields.name {
            Some(name) if *name != existing.name => {
                self.unique_slug(name, Some(&existing.slug)).await?
            }
            _ => existing.slug.clone(),
        };

        let recipe = repo::update(&self.db, id, &slug, &fields)
            .await
            .map_err(internal)?;
        info!(recipe_id = %id, "recipe updated");
        Ok(recipe.into())
    }

    pub async fn delete_recipe(&self, id: Uuid, author_id: Uuid) -> Result<(), AppError> {
        let existing = repo::find_by_id(&self.db, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("Recipe with ID {id} not found")))?;

        if existing.author_id != author_id {
            return Err(AppError::Forbidden(
                "You can only delete your own recipes".into(),
            ));
        }

        repo::delete(&self.db, id).await.map_err(internal)?;
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }

    pub async fn search_recipes(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RecipeWithAuthor>, AppError> {
        let rows = repo::search_published(&self.db, query, limit, offset)
            .await
            .map_err(internal)?;
        Ok(rows.into_iter().map(RecipeWithAuthor::from).collect())
    }

    async fn unique_slug(&self, name: &str, current: Option<&str>) -> Result<String, AppError> {
        let base = slugify(name);
        let taken = repo::slugs_with_prefix(&self.db, &base)
            .await
            .map_err(internal)?;
        Ok(match current {
            Some(current) => disambiguate_for_rename(&base, &taken, current),
            None => disambiguate(&base, &taken),
        })
    }
}

fn internal(e: anyhow::Error) -> AppError {
    AppError::Internal(e.to_string())
}
