//! Mood-aware video source with caching.

use std::sync::Arc;

use tracing::{debug, warn};

use super::types::{
    SearchOptions, SearchRequest, SearchResults, VideoDetails, VideoRecord, MAX_RESULTS_LIMIT,
};
use super::{VideoApi, VideoSourceError};
use crate::cache::{ResultCache, SearchSignature};
use crate::mood::MoodCatalog;
use crate::random::RandomSource;

/// Term appended to every mood keyword to bias results toward music.
pub const QUERY_SUFFIX: &str = "music";

/// Turns moods into searches and memoizes the results.
pub struct VideoSourceClient {
    api: Arc<dyn VideoApi>,
    catalog: Arc<MoodCatalog>,
    cache: Arc<ResultCache>,
    random: Arc<dyn RandomSource>,
}

impl VideoSourceClient {
    pub fn new(
        api: Arc<dyn VideoApi>,
        catalog: Arc<MoodCatalog>,
        cache: Arc<ResultCache>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            api,
            catalog,
            cache,
            random,
        }
    }

    pub fn catalog(&self) -> &MoodCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Compose a search query for a mood: a random keyword plus [`QUERY_SUFFIX`].
    pub fn compose_query(&self, mood_id: &str) -> Result<String, VideoSourceError> {
        if !self.catalog.contains(mood_id) {
            return Err(VideoSourceError::UnknownMood(mood_id.to_string()));
        }
        let keyword = self.catalog.random_keyword(mood_id, self.random.as_ref());
        Ok(format!("{} {}", keyword, QUERY_SUFFIX))
    }

    /// Search videos for a mood.
    ///
    /// An empty result list is a success; callers that need a video use
    /// [`random_video`](Self::random_video).
    pub async fn search(
        &self,
        mood_id: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, VideoSourceError> {
        self.api.check_credentials()?;

        if options.max_results == 0 || options.max_results > MAX_RESULTS_LIMIT {
            return Err(VideoSourceError::BadRequest(format!(
                "max_results must be between 1 and {}, got {}",
                MAX_RESULTS_LIMIT, options.max_results
            )));
        }

        let query = self.compose_query(mood_id)?;
        let signature = SearchSignature {
            query: query.clone(),
            max_results: options.max_results,
            duration: options.duration,
            category_id: options.category_id.clone(),
        };

        if options.use_cache {
            if let Some(videos) = self.cache.get_search(&signature) {
                debug!(mood = mood_id, key = %signature, "Serving search from cache");
                return Ok(SearchResults {
                    mood: mood_id.to_string(),
                    query,
                    videos,
                    from_cache: true,
                });
            }
        }

        let request = SearchRequest {
            query: query.clone(),
            max_results: options.max_results,
            duration: options.duration,
            category_id: options.category_id.clone(),
        };

        let videos = self.api.search(&request).await.map_err(|e| {
            warn!(mood = mood_id, backend = self.api.name(), error = %e, "Video search failed");
            e
        })?;

        self.cache.put_search(signature, videos.clone());

        Ok(SearchResults {
            mood: mood_id.to_string(),
            query,
            videos,
            from_cache: false,
        })
    }

    /// Look up one video by id.
    pub async fn get_details(
        &self,
        video_id: &str,
        use_cache: bool,
    ) -> Result<VideoDetails, VideoSourceError> {
        self.api.check_credentials()?;

        if video_id.trim().is_empty() {
            return Err(VideoSourceError::MissingVideoId);
        }

        if use_cache {
            if let Some(details) = self.cache.get_details(video_id) {
                return Ok(details);
            }
        }

        let details = self.api.video(video_id).await.map_err(|e| {
            warn!(video_id = video_id, backend = self.api.name(), error = %e, "Video lookup failed");
            e
        })?;

        self.cache.put_details(video_id, details.clone());
        Ok(details)
    }

    /// Search with the given options and pick one result uniformly at random.
    ///
    /// Videos whose id is in `exclude` are skipped unless nothing else is
    /// left, in which case the pick is made from the full list. An empty
    /// result list is reported as `NoResults`.
    pub async fn random_video(
        &self,
        mood_id: &str,
        options: &SearchOptions,
        exclude: &[String],
    ) -> Result<VideoRecord, VideoSourceError> {
        let results = self.search(mood_id, options).await?;

        if results.videos.is_empty() {
            return Err(VideoSourceError::NoResults {
                mood: results.mood,
                query: results.query,
            });
        }

        let (fresh, excluded): (Vec<_>, Vec<_>) = results
            .videos
            .into_iter()
            .partition(|video| !exclude.contains(&video.id));
        let mut candidates = if fresh.is_empty() {
            debug!(mood = mood_id, "Every result excluded, picking from all");
            excluded
        } else {
            fresh
        };

        let index = self.random.pick(candidates.len());
        Ok(candidates.swap_remove(index))
    }

    /// Drop all cached searches and details.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
