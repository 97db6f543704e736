pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod engine;
pub mod mood;
pub mod random;
pub mod streaming;
pub mod testing;
pub mod video_source;

pub use auth::{create_auth_capability, AnonymousAuth, AuthCapability, AuthError, StreamingAuth};
pub use cache::{CacheConfig, ResultCache};
pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use engine::{
    EngineError, FetchOutcome, PlaybackConfig, PlaybackEngine, PlaybackState, SessionSnapshot,
    SessionUpdateCallback,
};
pub use mood::{MoodCatalog, MoodDefinition, MoodError};
pub use random::{RandomSource, ThreadRandom};
pub use streaming::{StreamingClient, StreamingConfig, StreamingError};
pub use video_source::{
    ErrorReport, SearchOptions, SearchResults, VideoApi, VideoDetails, VideoRecord,
    VideoSourceClient, VideoSourceError, YouTubeApi, YouTubeConfig,
};
