//! Access token storage and redirect handling.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

/// Holds the streaming access token between requests.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: String);
    fn clear(&self);
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Extract `access_token` from a redirect URL fragment and store it.
///
/// Accepts the fragment with or without its leading `#`. Returns the token
/// when one was found; the store is left untouched otherwise.
pub fn parse_redirect_fragment(fragment: &str, store: &dyn TokenStore) -> Option<String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let token = fragment
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "access_token")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())?;

    debug!("Stored streaming access token from redirect");
    store.set_token(token.clone());
    Some(token)
}
