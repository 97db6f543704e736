//! Mock video API for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::video_source::{
    SearchRequest, VideoApi, VideoDetails, VideoRecord, VideoSourceError,
};

/// A recorded API call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedVideoCall {
    Search(SearchRequest),
    Video { video_id: String },
}

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<VideoRecord>> + Send + Sync>;

/// Mock implementation of the VideoApi trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results and video details
/// - Track calls for assertions
/// - Simulate failures, invalid credentials and slow responses
///
/// # Example
///
/// ```rust,ignore
/// use moodmix_core::testing::{MockVideoApi, fixtures};
///
/// let api = MockVideoApi::new();
/// api.set_results(fixtures::video_records(&["a", "b"])).await;
/// api.set_delay_for("sad", Duration::from_millis(100)).await;
///
/// let client = VideoSourceClient::new(Arc::new(api), ...);
/// ```
pub struct MockVideoApi {
    /// Results returned for every search unless a handler overrides them.
    results: Arc<RwLock<Vec<VideoRecord>>>,
    /// Video details by id.
    details: Arc<RwLock<HashMap<String, VideoDetails>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedVideoCall>>>,
    /// Errors returned by the next calls, in order.
    errors: Arc<RwLock<VecDeque<VideoSourceError>>>,
    /// Per-query delays (matched by substring).
    delays: Arc<RwLock<Vec<(String, Duration)>>>,
    /// Query handler for dynamic result generation.
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
    credentials_valid: AtomicBool,
}

impl std::fmt::Debug for MockVideoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockVideoApi")
            .field("results", &"<results>")
            .field("details", &"<details>")
            .field("calls", &"<calls>")
            .field("query_handler", &"<handler>")
            .field("credentials_valid", &self.credentials_valid)
            .finish()
    }
}

impl Default for MockVideoApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVideoApi {
    /// Create a new mock with no results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            errors: Arc::new(RwLock::new(VecDeque::new())),
            delays: Arc::new(RwLock::new(Vec::new())),
            query_handler: Arc::new(RwLock::new(None)),
            credentials_valid: AtomicBool::new(true),
        }
    }

    /// Set the results returned by subsequent searches.
    pub async fn set_results(&self, results: Vec<VideoRecord>) {
        *self.results.write().await = results;
    }

    /// Register details for a video id.
    pub async fn add_details(&self, details: VideoDetails) {
        self.details
            .write()
            .await
            .insert(details.video.id.clone(), details);
    }

    /// Set a handler that picks results per query string.
    ///
    /// Returning `None` falls back to the configured results.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<VideoRecord>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Delay searches whose query contains `fragment`.
    pub async fn set_delay_for(&self, fragment: &str, delay: Duration) {
        self.delays
            .write()
            .await
            .push((fragment.to_string(), delay));
    }

    /// Queue an error for the next call. Queued errors are consumed in order.
    pub async fn push_error(&self, error: VideoSourceError) {
        self.errors.write().await.push_back(error);
    }

    /// Queue the same error for the next `times` calls.
    pub async fn push_errors(&self, error: VideoSourceError, times: usize) {
        let mut errors = self.errors.write().await;
        for _ in 0..times {
            errors.push_back(error.clone());
        }
    }

    /// Make `check_credentials` fail with `InvalidApiKey`.
    pub fn set_credentials_valid(&self, valid: bool) {
        self.credentials_valid.store(valid, Ordering::SeqCst);
    }

    /// All calls that reached the mock.
    pub async fn recorded_calls(&self) -> Vec<RecordedVideoCall> {
        self.calls.read().await.clone()
    }

    /// Only the search requests.
    pub async fn recorded_searches(&self) -> Vec<SearchRequest> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                RecordedVideoCall::Search(request) => Some(request.clone()),
                RecordedVideoCall::Video { .. } => None,
            })
            .collect()
    }

    /// Number of calls that reached the mock.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Number of search calls.
    pub async fn search_count(&self) -> usize {
        self.recorded_searches().await.len()
    }

    async fn take_error(&self) -> Option<VideoSourceError> {
        self.errors.write().await.pop_front()
    }

    async fn delay_for(&self, query: &str) -> Option<Duration> {
        self.delays
            .read()
            .await
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, delay)| *delay)
    }
}

#[async_trait]
impl VideoApi for MockVideoApi {
    fn name(&self) -> &str {
        "mock"
    }

    fn check_credentials(&self) -> Result<(), VideoSourceError> {
        if self.credentials_valid.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(VideoSourceError::InvalidApiKey)
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<VideoRecord>, VideoSourceError> {
        self.calls
            .write()
            .await
            .push(RecordedVideoCall::Search(request.clone()));

        if let Some(delay) = self.delay_for(&request.query).await {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let handler = self.query_handler.read().await;
        let results = match handler.as_ref().and_then(|h| h(&request.query)) {
            Some(results) => results,
            None => self.results.read().await.clone(),
        };

        Ok(results
            .into_iter()
            .take(request.max_results as usize)
            .collect())
    }

    async fn video(&self, video_id: &str) -> Result<VideoDetails, VideoSourceError> {
        self.calls.write().await.push(RecordedVideoCall::Video {
            video_id: video_id.to_string(),
        });

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.details
            .read()
            .await
            .get(video_id)
            .cloned()
            .ok_or_else(|| VideoSourceError::VideoNotFound(video_id.to_string()))
    }
}
