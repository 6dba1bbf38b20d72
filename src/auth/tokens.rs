use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed claim set. The subject id is the only identity carried; the
/// services re-load the user on every validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub kind: TokenKind,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

/// Access and refresh tokens are signed with independent secrets, so a
/// leaked access secret cannot forge refresh tokens.
pub struct JwtKeys {
    access: KeyPair,
    refresh: KeyPair,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: KeyPair {
                encoding: EncodingKey::from_secret(config.secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.secret.as_bytes()),
                ttl: Duration::from_secs((config.ttl_minutes as u64) * 60),
            },
            refresh: KeyPair {
                encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
                ttl: Duration::from_secs((config.refresh_ttl_minutes as u64) * 60),
            },
        }
    }

    fn sign_with(&self, user_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let pair = match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        };
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(pair.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            kind,
        };
        let token = encode(&Header::default(), &claims, &pair.encoding)?;
        debug!(user_id = %user_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_with(user_id, TokenKind::Access)
    }

    pub fn sign_refresh(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_with(user_id, TokenKind::Refresh)
    }

    fn verify_with(&self, token: &str, kind: TokenKind) -> anyhow::Result<Claims> {
        let pair = match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        };
        let data = decode::<Claims>(token, &pair.decoding, &Validation::default())?;
        if data.claims.kind != kind {
            anyhow::bail!("wrong token kind");
        }
        debug!(user_id = %data.claims.sub, kind = ?kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<Claims> {
        self.verify_with(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        self.verify_with(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, refresh_secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            refresh_secret: refresh_secret.into(),
            ttl_minutes: 15,
            refresh_ttl_minutes: 60 * 24 * 7,
        })
    }

    #[test]
    fn sign_and_verify_access_token() {
        let keys = make_keys("access-secret", "refresh-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign_access(user_id).expect("sign access");
        let claims = keys.verify_access(&token).expect("verify access");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn both_tokens_decode_to_same_subject() {
        let keys = make_keys("access-secret", "refresh-secret");
        let user_id = Uuid::new_v4();
        let access = keys.sign_access(user_id).expect("sign access");
        let refresh = keys.sign_refresh(user_id).expect("sign refresh");
        assert_eq!(keys.verify_access(&access).expect("access").sub, user_id);
        assert_eq!(keys.verify_refresh(&refresh).expect("refresh").sub, user_id);
    }

    #[test]
    fn access_secret_cannot_verify_refresh_token() {
        let keys = make_keys("access-secret", "refresh-secret");
        let token = keys.sign_refresh(Uuid::new_v4()).expect("sign refresh");
        assert!(keys.verify_access(&token).is_err());
    }

    #[test]
    fn token_signed_with_wrong_secret_fails() {
        let good = make_keys("real-secret", "real-refresh");
        let forged = make_keys("other-secret", "other-refresh");
        let token = forged.sign_access(Uuid::new_v4()).expect("sign");
        assert!(good.verify_access(&token).is_err());
    }

    #[test]
    fn expired_token_fails_verification() {
        let keys = make_keys("s", "r");
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - TimeDuration::hours(2)).unix_timestamp() as usize,
            exp: (now - TimeDuration::hours(1)).unix_timestamp() as usize,
            kind: TokenKind::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"s"),
        )
        .expect("encode");
        assert!(keys.verify_access(&token).is_err());
    }
}
