//! Login credential, token issue/verify, and the request guard.

mod credentials;
pub mod middleware;
pub mod token;

pub use credentials::AdminCredential;
pub use middleware::{require_token, Identity};
pub use token::{Claims, TokenError, TokenService};
