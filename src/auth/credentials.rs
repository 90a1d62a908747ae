//! Single admin identity check.

/// The one identity allowed to log in. Plain exact-match comparison.
#[derive(Clone)]
pub struct AdminCredential {
    username: String,
    password: String,
}

impl AdminCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        AdminCredential {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// True only for the exact configured pair; empty input never matches.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        if username.is_empty() || password.is_empty() {
            return false;
        }
        username == self.username && password == self.password
    }
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
