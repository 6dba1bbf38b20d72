use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::dto::{
    AuthResponse, AuthenticatedUser, ChangePasswordRequest, Identity, LoginRequest,
    RefreshRequest, RegisterRequest, TokenPair,
};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo;
use crate::auth::tokens::JwtKeys;
use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Credential and token issuance. Stateless session model: no revocation
/// store, refresh tokens stay valid until their embedded expiry.
pub struct AuthService {
    db: PgPool,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(db: PgPool, keys: JwtKeys) -> Self {
        Self { db, keys }
    }

    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthResponse, AppError> {
        req.email = req.email.trim().to_lowercase();

        if !is_valid_email(&req.email) {
            return Err(AppError::BadRequest("Invalid email".into()));
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest("Password too short".into()));
        }

        // Fast-path duplicate check for a friendly message; the unique
        // constraints below stay authoritative under concurrency.
        if let Some(existing) =
            repo::find_by_email_or_username(&self.db, &req.email, &req.username)
                .await
                .map_err(internal)?
        {
            if existing.email == req.email {
                return Err(AppError::Conflict("Email already exists".into()));
            }
            return Err(AppError::Conflict("Username already exists".into()));
        }

        let hashed = hash_password(&req.password)?;
        let user = repo::create_user_with_credential(
            &self.db,
            &req.email,
            &req.username,
            req.first_name.as_deref(),
            req.last_name.as_deref(),
            &hashed,
        )
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Email or username already exists"))?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        let tokens = self.token_pair(user.id)?;
        Ok(AuthResponse {
            user: AuthenticatedUser {
                id: user.id,
                email: user.email,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
            },
            tokens,
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = req.email.trim().to_lowercase();
        let user = repo::find_with_credential_by_email(&self.db, &email)
            .await
            .map_err(internal)?;

        let user = match user {
            Some(u) if u.is_active => u,
            _ => {
                warn!(%email, "login for unknown or inactive user");
                return Err(AppError::Unauthorized("Invalid credentials".into()));
            }
        };

        let ok = verify_password(&req.password, &user.hashed_password)?;
        if !ok {
            warn!(user_id = %user.id, "login with invalid password");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }

        info!(user_id = %user.id, "user logged in");
        let tokens = self.token_pair(user.id)?;
        Ok(AuthResponse {
            user: AuthenticatedUser {
                id: user.id,
                email: user.email,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
            },
            tokens,
        })
    }

    pub async fn refresh_token(&self, req: RefreshRequest) -> Result<AuthResponse, AppError> {
        let claims = self
            .keys
            .verify_refresh(&req.refresh_token)
            .map_err(|_| AppError::Unauthorized("Invalid refresh token".into()))?;

        let user = repo::find_by_id(&self.db, claims.sub)
            .await
            .map_err(internal)?;
        let user = match user {
            Some(u) if u.is_active => u,
            _ => return Err(AppError::Unauthorized("User not found or inactive".into())),
        };

        let tokens = self.token_pair(user.id)?;
        Ok(AuthResponse {
            user: AuthenticatedUser {
                id: user.id,
                email: user.email,
                username: user.username,
                first_name: user.first_name,
                last_name: user.last_name,
            },
            tokens,
        })
    }

    /// Stateless logout: nothing to revoke, the tokens expire on their own.
    pub fn logout(&self, user_id: Uuid) {
        info!(%user_id, "user logged out; tokens remain valid until expiry");
    }

    pub async fn change_password(&self, req: ChangePasswordRequest) -> Result<(), AppError> {
        if req.new_password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest("Password too short".into()));
        }

        let user = repo::find_with_credential_by_id(&self.db, req.user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

        let ok = verify_password(&req.current_password, &user.hashed_password)?;
        if !ok {
            return Err(AppError::Unauthorized("Current password is incorrect".into()));
        }

        let hashed = hash_password(&req.new_password)?;
        repo::update_credential(&self.db, req.user_id, &hashed)
            .await
            .map_err(internal)?;
        info!(user_id = %req.user_id, "password changed");
        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self
            .keys
            .verify_access(token)
            .map_err(|_| AppError::Unauthorized("Invalid token".into()))?;

        let user = repo::find_by_id(&self.db, claims.sub)
            .await
            .map_err(internal)?;
        match user {
            Some(u) if u.is_active => Ok(Identity {
                id: u.id,
                email: u.email,
                username: u.username,
            }),
            _ => Err(AppError::Unauthorized("Invalid token".into())),
        }
    }

    fn token_pair(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        let access_token = self.keys.sign_access(user_id).map_err(internal)?;
        let refresh_token = self.keys.sign_refresh(user_id).map_err(internal)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

fn internal(e: anyhow::Error) -> AppError {
    AppError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("spaces in@mail.com"));
        assert!(!is_valid_email("missing@tld"));
    }
}
