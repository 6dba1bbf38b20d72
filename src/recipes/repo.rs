use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::dto::UpdateRecipeFields;

#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Flat join row; author columns are aliased to keep FromRow derivable.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeWithAuthorRow {
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_username: String,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
}

const RECIPE_COLUMNS: &str = "id, slug, name, description, ingredients, instructions, cooking_time, servings, image, is_published, author_id, created_at, updated_at";

const JOINED_COLUMNS: &str = r#"r.id, r.slug, r.name, r.description, r.ingredients, r.instructions,
       r.cooking_time, r.servings, r.image, r.is_published, r.author_id,
       r.created_at, r.updated_at,
       u.username AS author_username,
       u.first_name AS author_first_name,
       u.last_name AS author_last_name"#;

/// Slugs occupying the disambiguation space of `base`: the base itself and
/// any `base-*` suffix variant.
pub async fn slugs_with_prefix(db: &PgPool, base: &str) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT slug FROM recipes WHERE slug = $1 OR slug LIKE $1 || '-%'",
    )
    .bind(base)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(|(slug,)| slug).collect())
}

pub async fn insert(
    db: &PgPool,
    slug: &str,
    author_id: Uuid,
    name: &str,
    description: Option<&str>,
    ingredients: &[String],
    instructions: &[String],
    cooking_time: &str,
    servings: i32,
    image: &str,
    is_published: bool,
) -> Result<Recipe, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (slug, author_id, name, description, ingredients, instructions,
                             cooking_time, servings, image, is_published)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(slug)
    .bind(author_id)
    .bind(name)
    .bind(description)
    .bind(ingredients)
    .bind(instructions)
    .bind(cooking_time)
    .bind(servings)
    .bind(image)
    .bind(is_published)
    .fetch_one(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(recipe)
}

pub async fn find_with_author_by_id(
    db: &PgPool,
    id: Uuid,
) -> anyhow::Result<Option<RecipeWithAuthorRow>> {
    let row = sqlx::query_as::<_, RecipeWithAuthorRow>(&format!(
        r#"
        SELECT {JOINED_COLUMNS}
        FROM recipes r
        JOIN users u ON u.id = r.author_id
        WHERE r.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_with_author_by_slug(
    db: &PgPool,
    slug: &str,
) -> anyhow::Result<Option<RecipeWithAuthorRow>> {
    let row = sqlx::query_as::<_, RecipeWithAuthorRow>(&format!(
        r#"
        SELECT {JOINED_COLUMNS}
        FROM recipes r
        JOIN users u ON u.id = r.author_id
        WHERE r.slug = $1
        "#
    ))
    .bind(slug)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_all_published(
    db: &PgPool,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<RecipeWithAuthorRow>> {
    let rows = sqlx::query_as::<_, RecipeWithAuthorRow>(&format!(
        r#"
        SELECT {JOINED_COLUMNS}
        FROM recipes r
        JOIN users u ON u.id = r.author_id
        WHERE r.is_published = TRUE
        ORDER BY r.created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_author(
    db: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS} FROM recipes
        WHERE author_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn search_published(
    db: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<RecipeWithAuthorRow>> {
    let pattern = format!("%{query}%");
    let rows = sqlx::query_as::<_, RecipeWithAuthorRow>(&format!(
        r#"
        SELECT {JOINED_COLUMNS}
        FROM recipes r
        JOIN users u ON u.id = r.author_id
        WHERE r.is_published = TRUE
          AND (r.name ILIKE $1 OR r.description ILIKE $1 OR $2 = ANY(r.ingredients))
        ORDER BY r.created_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(pattern)
    .bind(query)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    slug: &str,
    fields: &UpdateRecipeFields,
) -> anyhow::Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        UPDATE recipes
        SET slug         = $2,
            name         = COALESCE($3, name),
            description  = COALESCE($4, description),
            ingredients  = COALESCE($5, ingredients),
            instructions = COALESCE($6, instructions),
            cooking_time = COALESCE($7, cooking_time),
            servings     = COALESCE($8, servings),
            image        = COALESCE($9, image),
            is_published = COALESCE($10, is_published),
            updated_at   = now()
        WHERE id = $1
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(slug)
    .bind(fields.name.as_deref())
    .bind(fields.description.as_deref())
    .bind(fields.ingredients.as_deref())
    .bind(fields.instructions.as_deref())
    .bind(fields.cooking_time.as_deref())
    .bind(fields.servings)
    .bind(fields.image.as_deref())
    .bind(fields.is_published)
    .fetch_one(db)
    .await?;
    Ok(recipe)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
