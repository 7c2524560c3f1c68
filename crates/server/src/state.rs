use std::sync::Arc;

use gemhunter_core::{
    hunt_event_channel, Config, GemHunter, HuntEventSender, HunterConfig, SanitizedConfig,
    SearchCache, SearchParameters, VideoPlatform,
};
use tokio::task::JoinHandle;

use crate::api::{spawn_event_forwarder, WsBroadcaster};

/// Buffer size for the hunt event channel.
const EVENT_BUFFER_SIZE: usize = 256;

/// Shared application state
pub struct AppState {
    config: Config,
    hunter: GemHunter,
    ws_broadcaster: WsBroadcaster,
}

impl AppState {
    pub fn new(
        config: Config,
        platform: Arc<dyn VideoPlatform>,
        cache: Option<Arc<dyn SearchCache>>,
        events: HuntEventSender,
        ws_broadcaster: WsBroadcaster,
    ) -> Self {
        let mut hunter =
            GemHunter::new(platform, HunterConfig::from_config(&config)).with_events(events);
        if let Some(cache) = cache {
            hunter = hunter.with_cache(cache);
        }

        Self {
            config,
            hunter,
            ws_broadcaster,
        }
    }

    /// Build state and start forwarding hunt events to WebSocket clients.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_event_forwarding(
        config: Config,
        platform: Arc<dyn VideoPlatform>,
        cache: Option<Arc<dyn SearchCache>>,
    ) -> (Self, JoinHandle<()>) {
        let ws_broadcaster = WsBroadcaster::default();
        let (events, rx) = hunt_event_channel(EVENT_BUFFER_SIZE);
        let forwarder = spawn_event_forwarder(rx, ws_broadcaster.clone());
        (
            Self::new(config, platform, cache, events, ws_broadcaster),
            forwarder,
        )
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hunter(&self) -> &GemHunter {
        &self.hunter
    }

    pub fn cache(&self) -> Option<&Arc<dyn SearchCache>> {
        self.hunter.cache()
    }

    pub fn ws_broadcaster(&self) -> &WsBroadcaster {
        &self.ws_broadcaster
    }

    /// Hunt parameters from the `[hunt]` section.
    pub fn default_parameters(&self) -> SearchParameters {
        let hunt = &self.config.hunt;
        SearchParameters {
            keywords: hunt.keywords.clone(),
            lookback_days: hunt.lookback_days,
            min_views: hunt.min_views,
            max_subscribers: hunt.max_subscribers,
        }
    }
}
