use std::sync::Arc;

use chrono::Duration;

use tokengate_auth::TokenIssuer;
use tokengate_users::UserRepository;

/// Collaborators shared by all handlers. Read-only after start-up.
pub struct AppServices {
    pub users: Arc<dyn UserRepository>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub token_ttl: Duration,
}
