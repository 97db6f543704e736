//! Playback engine implementation.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::config::PlaybackConfig;
use super::types::{EngineError, FetchOutcome, PlaybackState, SessionSnapshot};
use crate::video_source::{ErrorReport, SearchOptions, VideoRecord, VideoSourceClient};

/// Error code reported when a single player failure triggers an advance.
pub const PLAYER_ERROR: &str = "PLAYER_ERROR";

/// Error code reported when player failures hit the configured bound.
pub const PLAYBACK_FAILED: &str = "PLAYBACK_FAILED";

/// Callback invoked with every session change.
///
/// Runs after the session lock is released, so it may read the engine.
/// Snapshots from concurrent operations can arrive out of order.
pub type SessionUpdateCallback = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

#[derive(Debug, Default)]
struct Session {
    state: PlaybackState,
    selected_mood: Option<String>,
    current: Option<VideoRecord>,
    history: Vec<VideoRecord>,
    last_error: Option<ErrorReport>,
    last_player_error: Option<String>,
    consecutive_player_errors: u32,
    /// Bumped whenever a new fetch starts; responses carrying an older
    /// generation are discarded.
    generation: u64,
}

impl Session {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            selected_mood: self.selected_mood.clone(),
            current: self.current.clone(),
            history: self.history.clone(),
            last_error: self.last_error.clone(),
            last_player_error: self.last_player_error.clone(),
            consecutive_player_errors: self.consecutive_player_errors,
            loading: self.state == PlaybackState::Loading,
        }
    }

    fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.state = PlaybackState::Loading;
        self.generation
    }

    /// Ids the next pick should avoid: the current video and the history.
    fn played_ids(&self) -> Vec<String> {
        self.current
            .iter()
            .chain(self.history.iter())
            .map(|video| video.id.clone())
            .collect()
    }

    fn retire_current(&mut self) {
        if let Some(previous) = self.current.take() {
            self.history.push(previous);
        }
    }
}

/// Drives a mood session: select, play, advance, recover.
pub struct PlaybackEngine {
    config: PlaybackConfig,
    source: Arc<VideoSourceClient>,
    session: RwLock<Session>,
    update_callback: Option<SessionUpdateCallback>,
}

impl PlaybackEngine {
    pub fn new(config: PlaybackConfig, source: Arc<VideoSourceClient>) -> Self {
        Self {
            config,
            source,
            session: RwLock::new(Session::default()),
            update_callback: None,
        }
    }

    /// Register a callback fired after every state change.
    pub fn with_update_callback(mut self, callback: SessionUpdateCallback) -> Self {
        self.update_callback = Some(callback);
        self
    }

    pub fn source(&self) -> &Arc<VideoSourceClient> {
        &self.source
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.read().await.snapshot()
    }

    /// Snapshot without waiting; `None` while a state change holds the lock.
    pub fn try_snapshot(&self) -> Option<SessionSnapshot> {
        self.session.try_read().ok().map(|session| session.snapshot())
    }

    /// Start a new session for `mood_id` and fetch its first video.
    ///
    /// Allowed from any state. Any fetch still in flight for a previous
    /// selection is superseded.
    pub async fn select_mood(&self, mood_id: &str) -> FetchOutcome {
        let (generation, snapshot) = {
            let mut session = self.session.write().await;
            session.selected_mood = Some(mood_id.to_string());
            session.current = None;
            session.history.clear();
            session.last_error = None;
            session.last_player_error = None;
            session.consecutive_player_errors = 0;
            let generation = session.begin_fetch();
            info!(mood = mood_id, generation, "Mood selected");
            (generation, session.snapshot())
        };
        self.notify(snapshot);

        self.fetch_next(mood_id, generation).await
    }

    /// The current video finished; fetch the next one for the same mood.
    pub async fn on_playback_ended(&self) -> Result<FetchOutcome, EngineError> {
        let (mood_id, generation, snapshot) = {
            let mut session = self.session.write().await;
            let mood_id = Self::playing_mood(&session, "advance after playback ended")?;
            session.consecutive_player_errors = 0;
            let generation = session.begin_fetch();
            debug!(mood = %mood_id, generation, "Playback ended, advancing");
            (mood_id, generation, session.snapshot())
        };
        self.notify(snapshot);

        Ok(self.fetch_next(&mood_id, generation).await)
    }

    /// The player failed on the current video.
    ///
    /// Advances to another video until `max_consecutive_player_errors`
    /// failures happen in a row, then stops in the error state.
    pub async fn on_playback_error(
        &self,
        code: impl std::fmt::Display,
    ) -> Result<FetchOutcome, EngineError> {
        let code = code.to_string();
        let (mood_id, generation, snapshot) = {
            let mut session = self.session.write().await;
            let mood_id = Self::playing_mood(&session, "recover from a player error")?;
            session.consecutive_player_errors += 1;
            session.last_player_error = Some(code.clone());
            let failures = session.consecutive_player_errors;

            warn!(
                mood = %mood_id,
                video_id = session.current.as_ref().map(|v| v.id.as_str()).unwrap_or(""),
                code = %code,
                failures,
                "Player error"
            );

            if failures >= self.config.max_consecutive_player_errors {
                let report = ErrorReport::new(
                    PLAYBACK_FAILED,
                    format!(
                        "Playback failed {} times in a row (last player error: {}). Pick a mood to try again.",
                        failures, code
                    ),
                    true,
                );
                // Invalidate anything still in flight.
                session.generation += 1;
                session.retire_current();
                session.state = PlaybackState::Error;
                session.last_error = Some(report.clone());
                let snapshot = session.snapshot();
                drop(session);
                self.notify(snapshot);
                return Ok(FetchOutcome::Failed(report));
            }

            session.last_error = Some(ErrorReport::new(
                PLAYER_ERROR,
                format!("Playback error ({}). Trying another video...", code),
                true,
            ));
            let generation = session.begin_fetch();
            (mood_id, generation, session.snapshot())
        };
        self.notify(snapshot);

        Ok(self.fetch_next(&mood_id, generation).await)
    }

    /// Drop cached search results so the next fetch hits the network.
    pub fn clear_cache(&self) {
        self.source.clear_cache();
    }

    fn playing_mood(session: &Session, operation: &'static str) -> Result<String, EngineError> {
        match (&session.state, &session.selected_mood) {
            (PlaybackState::Playing, Some(mood_id)) => Ok(mood_id.clone()),
            _ => Err(EngineError::InvalidTransition {
                operation,
                state: session.state,
            }),
        }
    }

    async fn fetch_next(&self, mood_id: &str, generation: u64) -> FetchOutcome {
        let base = SearchOptions::default()
            .with_max_results(self.config.fan_out)
            .with_duration(self.config.video_duration);
        let max_attempts = self.config.max_fetch_attempts.max(1);
        let exclude = self.session.read().await.played_ids();
        let mut attempt = 0;

        loop {
            attempt += 1;
            // A retry must not be answered by the cached result that just failed us.
            let options = if attempt > 1 {
                base.clone().without_cache()
            } else {
                base.clone()
            };

            let result = self.source.random_video(mood_id, &options, &exclude).await;

            let mut session = self.session.write().await;
            if session.generation != generation
                || session.selected_mood.as_deref() != Some(mood_id)
            {
                debug!(
                    mood = mood_id,
                    generation,
                    current_generation = session.generation,
                    "Discarding stale fetch result"
                );
                return FetchOutcome::Stale;
            }

            match result {
                Ok(video) => {
                    info!(mood = mood_id, video_id = %video.id, title = %video.title, "Now playing");
                    session.retire_current();
                    session.current = Some(video.clone());
                    session.state = PlaybackState::Playing;
                    let snapshot = session.snapshot();
                    drop(session);
                    self.notify(snapshot);
                    return FetchOutcome::Playing(video);
                }
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        mood = mood_id,
                        attempt,
                        max_attempts,
                        error = %err,
                        "Fetch failed, retrying"
                    );
                }
                Err(err) => {
                    warn!(mood = mood_id, attempt, code = err.code(), error = %err, "Fetch failed");
                    let report = ErrorReport::from(&err);
                    session.retire_current();
                    session.state = PlaybackState::Error;
                    session.last_error = Some(report.clone());
                    let snapshot = session.snapshot();
                    drop(session);
                    self.notify(snapshot);
                    return FetchOutcome::Failed(report);
                }
            }
        }
    }

    fn notify(&self, snapshot: SessionSnapshot) {
        if let Some(callback) = &self.update_callback {
            callback(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, OnceLock, Weak};
    use std::time::Duration;

    use crate::cache::{CacheConfig, ResultCache};
    use crate::mood::MoodCatalog;
    use crate::testing::{fixtures, ManualClock, MockVideoApi, SequenceRandom};
    use crate::video_source::VideoSourceError;

    fn engine_with(api: Arc<MockVideoApi>, config: PlaybackConfig) -> PlaybackEngine {
        let cache = Arc::new(ResultCache::with_clock(
            &CacheConfig::default(),
            Arc::new(ManualClock::new()),
        ));
        let source = Arc::new(VideoSourceClient::new(
            api,
            Arc::new(MoodCatalog::builtin()),
            cache,
            Arc::new(SequenceRandom::first()),
        ));
        PlaybackEngine::new(config, source)
    }

    fn engine(api: Arc<MockVideoApi>) -> PlaybackEngine {
        engine_with(api, PlaybackConfig::default())
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let engine = engine(Arc::new(MockVideoApi::new()));
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.state, PlaybackState::Idle);
        assert!(snapshot.selected_mood.is_none());
        assert!(snapshot.current.is_none());
    }

    #[tokio::test]
    async fn test_select_mood_plays_a_result() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a", "b"])).await;
        let engine = engine(api.clone());

        let outcome = engine.select_mood("happy").await;

        let FetchOutcome::Playing(video) = outcome else {
            panic!("expected playing, got {:?}", outcome);
        };
        assert!(video.id == "a" || video.id == "b");

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.state, PlaybackState::Playing);
        assert_eq!(snapshot.selected_mood.as_deref(), Some("happy"));
        assert_eq!(snapshot.current.map(|v| v.id), Some(video.id));

        let searches = api.recorded_searches().await;
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].max_results, 15);
        assert_eq!(searches[0].query, "happy music music");
    }

    #[tokio::test]
    async fn test_playback_ended_moves_current_to_history() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a", "b"])).await;
        let engine = engine(api);

        engine.select_mood("happy").await;
        let outcome = engine.on_playback_ended().await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Playing(_)));

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.state, PlaybackState::Playing);
        assert_eq!(snapshot.history.len(), 1);
        assert!(snapshot.current.is_some());
    }

    #[tokio::test]
    async fn test_select_mood_resets_session() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a"])).await;
        let engine = engine(api);

        engine.select_mood("happy").await;
        engine.on_playback_ended().await.unwrap();
        engine.select_mood("sad").await;

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.selected_mood.as_deref(), Some("sad"));
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.consecutive_player_errors, 0);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let api = Arc::new(MockVideoApi::new());
        api.set_query_handler(|query| {
            if query.contains("happy") {
                Some(fixtures::video_records(&["happy-1"]))
            } else {
                Some(fixtures::video_records(&["sad-1"]))
            }
        })
        .await;
        api.set_delay_for("happy", Duration::from_millis(200)).await;
        let engine = Arc::new(engine(api));

        let slow = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.select_mood("happy").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let outcome = engine.select_mood("sad").await;
        assert_eq!(outcome, FetchOutcome::Playing(fixtures::video_record("sad-1")));

        let stale = slow.await.unwrap();
        assert_eq!(stale, FetchOutcome::Stale);

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.selected_mood.as_deref(), Some("sad"));
        assert_eq!(snapshot.current.map(|v| v.id), Some("sad-1".to_string()));
        assert_eq!(snapshot.state, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_unusable_key_fails_without_network() {
        let api = Arc::new(MockVideoApi::new());
        api.set_credentials_valid(false);
        let engine = engine(api.clone());

        let outcome = engine.select_mood("happy").await;

        let FetchOutcome::Failed(report) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(report.code, "INVALID_API_KEY");
        assert_eq!(api.call_count().await, 0);
        assert_eq!(engine.snapshot().await.state, PlaybackState::Error);
    }

    #[tokio::test]
    async fn test_unknown_mood_surfaces_error() {
        let api = Arc::new(MockVideoApi::new());
        let engine = engine(api.clone());

        let outcome = engine.select_mood("grumpy").await;

        let FetchOutcome::Failed(report) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(report.code, "UNKNOWN_MOOD");
        assert_eq!(api.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_player_errors_are_bounded() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a", "b"])).await;
        let engine = engine(api);

        engine.select_mood("happy").await;

        for expected in 1..=2 {
            let outcome = engine.on_playback_error(150).await.unwrap();
            assert!(matches!(outcome, FetchOutcome::Playing(_)));
            let snapshot = engine.snapshot().await;
            assert_eq!(snapshot.consecutive_player_errors, expected);
            assert_eq!(snapshot.last_player_error.as_deref(), Some("150"));
        }

        let outcome = engine.on_playback_error("5").await.unwrap();
        let FetchOutcome::Failed(report) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(report.code, PLAYBACK_FAILED);

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.state, PlaybackState::Error);
        assert!(snapshot.current.is_none());

        // No more automatic advancing once stopped.
        let err = engine.on_playback_error(150).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransition {
                operation: "recover from a player error",
                state: PlaybackState::Error,
            }
        );
    }

    #[tokio::test]
    async fn test_finished_video_resets_player_error_count() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a"])).await;
        let engine = engine(api);

        engine.select_mood("happy").await;
        engine.on_playback_error(100).await.unwrap();
        engine.on_playback_error(100).await.unwrap();
        engine.on_playback_ended().await.unwrap();
        engine.on_playback_error(100).await.unwrap();

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.state, PlaybackState::Playing);
        assert_eq!(snapshot.consecutive_player_errors, 1);
    }

    #[tokio::test]
    async fn test_transient_fetch_errors_are_retried() {
        let api = Arc::new(MockVideoApi::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        api.set_query_handler(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Some(Vec::new())
            } else {
                Some(fixtures::video_records(&["late"]))
            }
        })
        .await;
        let engine = engine(api.clone());

        let outcome = engine.select_mood("calm").await;

        assert_eq!(outcome, FetchOutcome::Playing(fixtures::video_record("late")));
        assert_eq!(api.search_count().await, 2);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let api = Arc::new(MockVideoApi::new());
        api.push_errors(VideoSourceError::ServerError { status: 503 }, 5)
            .await;
        let config = PlaybackConfig {
            max_fetch_attempts: 2,
            ..Default::default()
        };
        let engine = engine_with(api.clone(), config);

        let outcome = engine.select_mood("focused").await;

        let FetchOutcome::Failed(report) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(report.code, "SERVER_ERROR");
        assert_eq!(api.search_count().await, 2);
    }

    #[tokio::test]
    async fn test_quota_exceeded_is_not_retried() {
        let api = Arc::new(MockVideoApi::new());
        api.push_errors(VideoSourceError::QuotaExceeded, 3).await;
        let engine = engine(api.clone());

        let outcome = engine.select_mood("happy").await;

        let FetchOutcome::Failed(report) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(report.code, "QUOTA_EXCEEDED");
        assert_eq!(api.search_count().await, 1);
    }

    #[tokio::test]
    async fn test_advance_requires_playing_state() {
        let engine = engine(Arc::new(MockVideoApi::new()));

        let err = engine.on_playback_ended().await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                state: PlaybackState::Idle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_callback_sees_transitions() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a"])).await;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: SessionUpdateCallback = Arc::new(move |snapshot: &SessionSnapshot| {
            sink.lock().unwrap().push(snapshot.state);
        });
        let engine = engine(api).with_update_callback(callback);

        engine.select_mood("happy").await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![PlaybackState::Loading, PlaybackState::Playing]
        );
    }

    #[tokio::test]
    async fn test_player_error_picks_another_video() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["bad", "good"])).await;
        let engine = engine(api);

        let first = engine.select_mood("happy").await;
        assert_eq!(first, FetchOutcome::Playing(fixtures::video_record("bad")));

        let outcome = engine.on_playback_error(150).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Playing(fixtures::video_record("good")));

        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.current.map(|v| v.id), Some("good".to_string()));
        assert_eq!(snapshot.history, vec![fixtures::video_record("bad")]);
    }

    #[tokio::test]
    async fn test_played_videos_repeat_once_exhausted() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a", "b"])).await;
        let engine = engine(api);

        engine.select_mood("happy").await;
        let second = engine.on_playback_ended().await.unwrap();
        assert_eq!(second, FetchOutcome::Playing(fixtures::video_record("b")));

        let third = engine.on_playback_ended().await.unwrap();
        assert_eq!(third, FetchOutcome::Playing(fixtures::video_record("a")));
    }

    #[tokio::test]
    async fn test_update_callback_can_read_engine() {
        let api = Arc::new(MockVideoApi::new());
        api.set_results(fixtures::video_records(&["a"])).await;
        let handle: Arc<OnceLock<Weak<PlaybackEngine>>> = Arc::new(OnceLock::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let lookup = Arc::clone(&handle);
        let sink = Arc::clone(&seen);
        let callback: SessionUpdateCallback = Arc::new(move |snapshot: &SessionSnapshot| {
            let engine = lookup.get().and_then(Weak::upgrade).unwrap();
            let current = engine.try_snapshot().map(|s| s.state);
            sink.lock().unwrap().push((snapshot.state, current));
        });
        let engine = Arc::new(engine(api).with_update_callback(callback));
        handle.set(Arc::downgrade(&engine)).unwrap();

        engine.select_mood("happy").await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (PlaybackState::Loading, Some(PlaybackState::Loading)),
                (PlaybackState::Playing, Some(PlaybackState::Playing)),
            ]
        );
    }
}
