use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{AuthCapability, AuthError};
use crate::streaming::{parse_redirect_fragment, StreamingClient, StreamingError, UserProfile};

/// Capability backed by a streaming service access token.
///
/// The profile is fetched once per token and remembered until logout or
/// until the service rejects the token.
pub struct StreamingAuth {
    client: StreamingClient,
    profile: RwLock<Option<UserProfile>>,
}

impl StreamingAuth {
    pub fn new(client: StreamingClient) -> Self {
        Self {
            client,
            profile: RwLock::new(None),
        }
    }

    /// Complete a login from the redirect URL fragment.
    pub async fn complete_login(&self, fragment: &str) -> Result<UserProfile, AuthError> {
        parse_redirect_fragment(fragment, self.client.tokens().as_ref())
            .ok_or(AuthError::NotAuthenticated)?;

        *self.profile.write().await = None;
        let profile = self.load_profile().await?.ok_or(AuthError::NotAuthenticated)?;
        info!(user_id = %profile.id, "Signed in to streaming service");
        Ok(profile)
    }

    pub async fn logout(&self) {
        self.client.tokens().clear();
        *self.profile.write().await = None;
    }

    pub fn client(&self) -> &StreamingClient {
        &self.client
    }

    async fn load_profile(&self) -> Result<Option<UserProfile>, AuthError> {
        if let Some(profile) = self.profile.read().await.clone() {
            return Ok(Some(profile));
        }

        match self.client.user_profile().await {
            Ok(profile) => {
                *self.profile.write().await = Some(profile.clone());
                Ok(Some(profile))
            }
            Err(StreamingError::NotAuthenticated) => Ok(None),
            Err(StreamingError::Unauthorized) => {
                warn!("Streaming token rejected, signing out");
                self.client.tokens().clear();
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AuthCapability for StreamingAuth {
    async fn is_authenticated(&self) -> bool {
        matches!(self.load_profile().await, Ok(Some(_)))
    }

    async fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        self.load_profile().await
    }

    fn method_name(&self) -> &'static str {
        "streaming"
    }
}
