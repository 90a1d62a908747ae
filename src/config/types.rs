//! Runtime configuration handed to the service at startup.

use crate::auth::AdminCredential;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub http: HttpConfig,
    pub auth: AuthConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub bind_addr: String,
    /// Upper bound on request body size in bytes.
    pub body_limit: usize,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub admin: AdminCredential,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("admin", &self.admin)
            .finish()
    }
}
