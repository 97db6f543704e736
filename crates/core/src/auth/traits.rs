use async_trait::async_trait;
use thiserror::Error;

use crate::streaming::{StreamingError, UserProfile};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Streaming service error: {0}")]
    Streaming(#[from] StreamingError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Who, if anyone, is signed in.
///
/// Kept outside the playback path: nothing in the engine consults it.
#[async_trait]
pub trait AuthCapability: Send + Sync {
    async fn is_authenticated(&self) -> bool;

    /// Profile of the signed-in user, `None` when signed out.
    async fn current_user(&self) -> Result<Option<UserProfile>, AuthError>;

    /// Name of this authentication method
    fn method_name(&self) -> &'static str;
}
