//! Streaming service configuration and the authorization URL.

use serde::{Deserialize, Serialize};

use super::StreamingError;

/// Permissions requested during authorization.
pub const AUTH_SCOPES: [&str; 5] = [
    "user-read-private",
    "user-read-email",
    "user-library-read",
    "playlist-modify-public",
    "playlist-modify-private",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Web API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Authorization endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Market used to filter recommendations.
    #[serde(default = "default_market")]
    pub market: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_auth_url() -> String {
    "https://accounts.spotify.com/authorize".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:5173/callback".to_string()
}

fn default_market() -> String {
    "US".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth_url: default_auth_url(),
            client_id: String::new(),
            redirect_uri: default_redirect_uri(),
            market: default_market(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Build the implicit-grant authorization URL.
///
/// The service redirects back to `redirect_uri` with the access token in
/// the URL fragment; see [`parse_redirect_fragment`](super::parse_redirect_fragment).
pub fn authorize_url(config: &StreamingConfig) -> Result<String, StreamingError> {
    if config.client_id.trim().is_empty() {
        return Err(StreamingError::InvalidConfig(
            "streaming.client_id is not set".to_string(),
        ));
    }

    let scope = AUTH_SCOPES.join(" ");
    let params = [
        ("client_id", config.client_id.as_str()),
        ("response_type", "token"),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("scope", scope.as_str()),
        ("show_dialog", "true"),
    ];

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!("{}?{}", config.auth_url, query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StreamingConfig {
        StreamingConfig {
            client_id: "client-123".to_string(),
            redirect_uri: "http://localhost:5173/callback".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_authorize_url_contains_all_params() {
        let url = authorize_url(&config()).unwrap();

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=token"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5173%2Fcallback"));
        assert!(url.contains(
            "scope=user-read-private%20user-read-email%20user-library-read%20playlist-modify-public%20playlist-modify-private"
        ));
        assert!(url.ends_with("show_dialog=true"));
    }

    #[test]
    fn test_authorize_url_requires_client_id() {
        let config = StreamingConfig::default();
        assert!(matches!(
            authorize_url(&config),
            Err(StreamingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: StreamingConfig = toml::from_str(r#"client_id = "abc""#).unwrap();
        assert_eq!(config.client_id, "abc");
        assert_eq!(config.market, "US");
        assert_eq!(config.api_url, "https://api.spotify.com/v1");
        assert_eq!(config.timeout_secs, 10);
    }
}
