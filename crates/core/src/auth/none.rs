use async_trait::async_trait;

use super::{AuthCapability, AuthError};
use crate::streaming::UserProfile;

/// Capability for sessions without any signed-in user.
pub struct AnonymousAuth;

impl AnonymousAuth {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnonymousAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthCapability for AnonymousAuth {
    async fn is_authenticated(&self) -> bool {
        false
    }

    async fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        Ok(None)
    }

    fn method_name(&self) -> &'static str {
        "anonymous"
    }
}
