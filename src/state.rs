//! Shared application state for all routes.

use crate::auth::{AdminCredential, TokenService};
use crate::config::AuthConfig;
use crate::store::StudentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StudentStore>,
    pub tokens: Arc<TokenService>,
    pub admin: Arc<AdminCredential>,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, auth: &AuthConfig) -> Self {
        AppState {
            store,
            tokens: Arc::new(TokenService::new(auth.jwt_secret.as_bytes(), auth.token_ttl)),
            admin: Arc::new(auth.admin.clone()),
        }
    }
}
