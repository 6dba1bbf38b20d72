use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

/// User row joined with its credential; the hash never leaves this module
/// except for verification.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithCredential {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub hashed_password: String,
}

pub async fn find_by_email_or_username(
    db: &PgPool,
    email: &str,
    username: &str,
) -> anyhow::Result<Option<UserRecord>> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, email, username, first_name, last_name, is_active, created_at
        FROM users
        WHERE email = $1 OR username = $2
        LIMIT 1
        "#,
    )
    .bind(email)
    .bind(username)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<UserRecord>> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, email, username, first_name, last_name, is_active, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_with_credential_by_email(
    db: &PgPool,
    email: &str,
) -> anyhow::Result<Option<UserWithCredential>> {
    let user = sqlx::query_as::<_, UserWithCredential>(
        r#"
        SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.is_active,
               c.hashed_password
        FROM users u
        JOIN auth_credentials c ON c.user_id = u.id
        WHERE u.email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_with_credential_by_id(
    db: &PgPool,
    id: Uuid,
) -> anyhow::Result<Option<UserWithCredential>> {
    let user = sqlx::query_as::<_, UserWithCredential>(
        r#"
        SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.is_active,
               c.hashed_password
        FROM users u
        JOIN auth_credentials c ON c.user_id = u.id
        WHERE u.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Inserts the user row and its credential in one transaction so a failed
/// credential write never leaves a password-less account behind.
pub async fn create_user_with_credential(
    db: &PgPool,
    email: &str,
    username: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    hashed_password: &str,
) -> Result<UserRecord, sqlx::Error> {
    let mut tx = db.begin().await?;

    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (email, username, first_name, last_name)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, username, first_name, last_name, is_active, created_at
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO auth_credentials (user_id, hashed_password)
        VALUES ($1, $2)
        "#,
    )
    .bind(user.id)
    .bind(hashed_password)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(user)
}

pub async fn update_credential(
    db: &PgPool,
    user_id: Uuid,
    hashed_password: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE auth_credentials
        SET hashed_password = $2, updated_at = now()
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(hashed_password)
    .execute(db)
    .await?;
    Ok(())
}
