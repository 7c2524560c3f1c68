pub mod cache;
pub mod config;
pub mod hunter;
pub mod metrics;
pub mod platform;
pub mod scoring;
pub mod testing;

pub use cache::{InMemorySearchCache, SearchCache, SearchCacheKey, SearchCacheStats};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    HuntConfig, SanitizedConfig, ScoringConfig, ServerConfig, SmoothingKind, YouTubeConfig,
};
pub use hunter::{
    hunt_event_channel, GemHunter, GemRecord, HuntError, HuntEvent, HuntEventSender, HuntReport,
    HunterConfig, KeywordStage, KeywordWarning, SearchParameters,
};
pub use platform::{PlatformError, VideoPlatform, YouTubeClient};
pub use scoring::SmoothingPolicy;
