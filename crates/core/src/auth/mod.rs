//! Optional user authentication against the streaming service.

mod bearer;
mod none;
mod traits;

pub use bearer::*;
pub use none::*;
pub use traits::*;

use std::sync::Arc;

use crate::streaming::{StreamingClient, StreamingConfig, TokenStore};

/// Pick the capability matching the configuration.
///
/// Without a `[streaming]` section every session is anonymous.
pub fn create_auth_capability(
    config: Option<&StreamingConfig>,
    tokens: Arc<dyn TokenStore>,
) -> Result<Arc<dyn AuthCapability>, AuthError> {
    match config {
        None => Ok(Arc::new(AnonymousAuth::new())),
        Some(config) => {
            if config.client_id.trim().is_empty() {
                return Err(AuthError::ConfigurationError(
                    "streaming.client_id must be set to sign in".to_string(),
                ));
            }
            let client = StreamingClient::new(config, tokens)?;
            Ok(Arc::new(StreamingAuth::new(client)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::MemoryTokenStore;

    #[test]
    fn test_create_without_streaming_is_anonymous() {
        let auth = create_auth_capability(None, Arc::new(MemoryTokenStore::new())).unwrap();
        assert_eq!(auth.method_name(), "anonymous");
    }

    #[test]
    fn test_create_with_streaming() {
        let config = StreamingConfig {
            client_id: "client".to_string(),
            ..Default::default()
        };
        let auth = create_auth_capability(Some(&config), Arc::new(MemoryTokenStore::new())).unwrap();
        assert_eq!(auth.method_name(), "streaming");
    }

    #[test]
    fn test_create_with_missing_client_id() {
        let config = StreamingConfig::default();
        let result = create_auth_capability(Some(&config), Arc::new(MemoryTokenStore::new()));
        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }
}
