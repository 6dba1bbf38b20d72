use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::users::dto::{
    CreateUserPayload, RecipeSummary, UpdateUserFields, UserProfile, UserView,
};
use crate::users::repo;

pub struct UsersService {
    db: PgPool,
}

impl UsersService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<UserView, AppError> {
        if payload.password.is_some() {
            return Err(AppError::BadRequest(
                "Password should not be provided when creating user directly. Use auth service for registration.".into(),
            ));
        }

        if let Some(existing) =
            repo::find_first_by_email_or_username(&self.db, &payload.email, &payload.username)
                .await
                .map_err(internal)?
        {
            if existing.email == payload.email {
                return Err(AppError::Conflict("Email already exists".into()));
            }
            return Err(AppError::Conflict("Username already exists".into()));
        }

        let user = repo::insert(
            &self.db,
            &payload.email,
            &payload.username,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
            payload.bio.as_deref(),
            payload.avatar.as_deref(),
        )
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email or username already exists"))?;

        info!(user_id = %user.id, "user created");
        Ok(user.into())
    }

    pub async fn find_all_users(&self, limit: i64, offset: i64) -> Result<Vec<UserView>, AppError> {
        let users = repo::find_all_active(&self.db, limit, offset)
            .await
            .map_err(internal)?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Result<UserView, AppError> {
        let user = repo::find_by_id(&self.db, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;
        Ok(user.into())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<UserView, AppError> {
        let user = repo::find_by_email(&self.db, email)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("User with email {email} not found")))?;
        Ok(user.into())
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<UserView, AppError> {
        let user = repo::find_by_username(&self.db, username)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with username {username} not found"))
            })?;
        Ok(user.into())
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        caller_id: Uuid,
        fields: UpdateUserFields,
    ) -> Result<UserView, AppError> {
        let existing = repo::find_by_id(&self.db, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;

        if existing.id != caller_id {
            return Err(AppError::Forbidden(
                "You can only update your own profile".into(),
            ));
        }

        let user = repo::update_profile(&self.db, id, &fields)
            .await
            .map_err(internal)?;
        info!(user_id = %id, "user updated");
        Ok(user.into())
    }

    /// Soft delete: the row stays, `is_active` flips off.
    pub async fn deactivate_user(&self, id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
        let existing = repo::find_by_id(&self.db, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;

        if existing.id != caller_id {
            return Err(AppError::Forbidden(
                "You can only deactivate your own profile".into(),
            ));
        }

        repo::deactivate(&self.db, id).await.map_err(internal)?;
        info!(user_id = %id, "user deactivated");
        Ok(())
    }

    pub async fn search_users(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserView>, AppError> {
        let users = repo::search_active(&self.db, query, limit, offset)
            .await
            .map_err(internal)?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    pub async fn get_user_profile(&self, id: Uuid) -> Result<UserProfile, AppError> {
        let user = repo::find_by_id(&self.db, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {id} not found")))?;

        let recipes = repo::recipe_summaries_by_author(&self.db, id)
            .await
            .map_err(internal)?
            .into_iter()
            .map(|r| RecipeSummary {
                id: r.id,
                name: r.name,
                image: r.image,
                created_at: r.created_at,
            })
            .collect();

        Ok(UserProfile {
            user: user.into(),
            recipes,
        })
    }
}

fn internal(e: anyhow::Error) -> AppError {
    AppError::Internal(e.to_string())
}
