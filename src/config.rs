use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Signing key for access tokens.
    pub secret: String,
    /// Independent signing key for refresh tokens, so a leaked access
    /// secret cannot forge refresh tokens.
    pub refresh_secret: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAddr {
    pub host: String,
    pub port: u16,
}

impl ServiceAddr {
    fn from_env(host_var: &str, port_var: &str, default_port: u16) -> Self {
        Self {
            host: std::env::var(host_var).unwrap_or_else(|_| "127.0.0.1".into()),
            port: std::env::var(port_var)
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(default_port),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub auth_service: ServiceAddr,
    pub recipe_service: ServiceAddr,
    pub users_service: ServiceAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            refresh_secret: std::env::var("JWT_REFRESH_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        Ok(Self {
            database_url,
            jwt,
            auth_service: ServiceAddr::from_env("AUTH_SERVICE_HOST", "AUTH_SERVICE_PORT", 4001),
            recipe_service: ServiceAddr::from_env(
                "RECIPE_SERVICE_HOST",
                "RECIPE_SERVICE_PORT",
                4002,
            ),
            users_service: ServiceAddr::from_env("USERS_SERVICE_HOST", "USERS_SERVICE_PORT", 4003),
        })
    }
}
