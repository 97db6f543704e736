//! Bearer-token client for the streaming Web API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::config::StreamingConfig;
use super::features::mood_features;
use super::token::TokenStore;
use super::types::{ApiErrorBody, Playlist, RecommendationsResponse, Track, UserProfile};
use super::StreamingError;

/// Streaming Web API client.
///
/// Every request reads the current token from the store, so tokens set
/// after construction are picked up.
pub struct StreamingClient {
    client: Client,
    api_url: String,
    market: String,
    tokens: Arc<dyn TokenStore>,
}

impl StreamingClient {
    pub fn new(config: &StreamingConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, StreamingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StreamingError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            market: config.market.clone(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Fetch the authenticated user's profile.
    pub async fn user_profile(&self) -> Result<UserProfile, StreamingError> {
        let request = self.client.get(format!("{}/me", self.api_url));
        self.send(request).await
    }

    /// Recommended tracks tuned to the mood's audio features.
    pub async fn recommendations(&self, mood: &str, limit: u32) -> Result<Vec<Track>, StreamingError> {
        let features =
            mood_features(mood).ok_or_else(|| StreamingError::UnsupportedMood(mood.to_string()))?;

        let mut query: Vec<(String, String)> = vec![("limit".to_string(), limit.to_string())];
        query.extend(
            features
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        query.push(("market".to_string(), self.market.clone()));

        debug!(mood, limit, "Requesting recommendations");

        let request = self
            .client
            .get(format!("{}/recommendations", self.api_url))
            .query(&query);
        let response: RecommendationsResponse = self.send(request).await?;

        Ok(response.tracks.into_iter().map(Track::from).collect())
    }

    /// Create a private playlist for `user_id` and add `tracks` to it.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        tracks: &[Track],
    ) -> Result<Playlist, StreamingError> {
        let request = self
            .client
            .post(format!(
                "{}/users/{}/playlists",
                self.api_url,
                urlencoding::encode(user_id)
            ))
            .json(&json!({
                "name": name,
                "description": description,
                "public": false,
            }));
        let playlist: Playlist = self.send(request).await?;

        let uris: Vec<&str> = tracks.iter().map(|track| track.uri.as_str()).collect();
        let request = self
            .client
            .post(format!(
                "{}/playlists/{}/tracks",
                self.api_url,
                urlencoding::encode(&playlist.id)
            ))
            .json(&json!({ "uris": uris }));
        let _: serde_json::Value = self.send(request).await?;

        debug!(playlist_id = %playlist.id, tracks = tracks.len(), "Created playlist");
        Ok(playlist)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StreamingError> {
        let token = self.tokens.token().ok_or(StreamingError::NotAuthenticated)?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StreamingError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StreamingError::Network(e.to_string()))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            warn!("Streaming access token rejected");
            return Err(StreamingError::Unauthorized);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "Streaming API error");
            return Err(StreamingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| StreamingError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::MemoryTokenStore;

    #[tokio::test]
    async fn test_requests_without_token_fail_locally() {
        let config = StreamingConfig {
            // Nothing listens here; the token check must fail first.
            api_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let client = StreamingClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();

        assert_eq!(
            client.user_profile().await.unwrap_err(),
            StreamingError::NotAuthenticated
        );
    }

    #[tokio::test]
    async fn test_unsupported_mood() {
        let client = StreamingClient::new(
            &StreamingConfig::default(),
            Arc::new(MemoryTokenStore::with_token("t")),
        )
        .unwrap();

        assert_eq!(
            client.recommendations("romantic", 10).await.unwrap_err(),
            StreamingError::UnsupportedMood("romantic".to_string())
        );
    }
}
