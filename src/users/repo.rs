use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::dto::UpdateUserFields;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, email, username, first_name, last_name, bio, avatar, is_active, created_at, updated_at";

pub async fn find_first_by_email_or_username(
    db: &PgPool,
    email: &str,
    username: &str,
) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1 OR username = $2 LIMIT 1"
    ))
    .bind(email)
    .bind(username)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn insert(
    db: &PgPool,
    email: &str,
    username: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    bio: Option<&str>,
    avatar: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, username, first_name, last_name, bio, avatar)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(email)
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .bind(bio)
    .bind(avatar)
    .fetch_one(db)
    .await
}

pub async fn find_all_active(
    db: &PgPool,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<User>> {
    let rows = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users
        WHERE is_active = TRUE
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn update_profile(
    db: &PgPool,
    id: Uuid,
    fields: &UpdateUserFields,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name  = COALESCE($3, last_name),
            bio        = COALESCE($4, bio),
            avatar     = COALESCE($5, avatar),
            updated_at = now()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(fields.first_name.as_deref())
    .bind(fields.last_name.as_deref())
    .bind(fields.bio.as_deref())
    .bind(fields.avatar.as_deref())
    .fetch_one(db)
    .await?;
    Ok(user)
}

pub async fn deactivate(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET is_active = FALSE, updated_at = now() WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn search_active(
    db: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<User>> {
    let pattern = format!("%{query}%");
    let rows = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users
        WHERE is_active = TRUE
          AND (username ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1)
        ORDER BY username ASC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn recipe_summaries_by_author(
    db: &PgPool,
    author_id: Uuid,
) -> anyhow::Result<Vec<RecipeSummaryRow>> {
    let rows = sqlx::query_as::<_, RecipeSummaryRow>(
        r#"
        SELECT id, name, image, created_at
        FROM recipes
        WHERE author_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(author_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
