//! Progress and warning events emitted while a hunt runs.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::KeywordWarning;

/// Event describing hunt progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HuntEvent {
    Started {
        run_id: Uuid,
        total_keywords: usize,
        published_after: String,
    },
    KeywordStarted {
        run_id: Uuid,
        /// 1-based position in the keyword list.
        index: usize,
        total: usize,
        keyword: String,
    },
    KeywordCompleted {
        run_id: Uuid,
        index: usize,
        total: usize,
        keyword: String,
        candidates: usize,
        gems: usize,
        from_cache: bool,
    },
    /// The keyword was skipped; the run goes on.
    Warning {
        run_id: Uuid,
        index: usize,
        total: usize,
        warning: KeywordWarning,
    },
    /// Terminal: quota or credential failure.
    Aborted {
        run_id: Uuid,
        keyword: String,
        error: String,
    },
    Finished {
        run_id: Uuid,
        gems: usize,
        warnings: usize,
        duration_ms: u64,
    },
}

impl HuntEvent {
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::Started { run_id, .. }
            | Self::KeywordStarted { run_id, .. }
            | Self::KeywordCompleted { run_id, .. }
            | Self::Warning { run_id, .. }
            | Self::Aborted { run_id, .. }
            | Self::Finished { run_id, .. } => *run_id,
        }
    }

    /// Event type name, as serialized.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::KeywordStarted { .. } => "keyword_started",
            Self::KeywordCompleted { .. } => "keyword_completed",
            Self::Warning { .. } => "warning",
            Self::Aborted { .. } => "aborted",
            Self::Finished { .. } => "finished",
        }
    }
}

/// Handle for emitting hunt events.
///
/// Cheaply cloneable. Emitting never waits: if the channel is full or closed
/// the event is dropped and logged.
#[derive(Debug, Clone)]
pub struct HuntEventSender {
    tx: mpsc::Sender<HuntEvent>,
}

impl HuntEventSender {
    pub fn new(tx: mpsc::Sender<HuntEvent>) -> Self {
        Self { tx }
    }

    /// Try to emit an event without blocking.
    ///
    /// Returns true if the event was queued.
    pub fn emit(&self, event: HuntEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("Dropped hunt event: {}", e);
                false
            }
        }
    }
}

/// Create a bounded event channel.
pub fn hunt_event_channel(capacity: usize) -> (HuntEventSender, mpsc::Receiver<HuntEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (HuntEventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_event() {
        let (sender, mut rx) = hunt_event_channel(10);
        let run_id = Uuid::new_v4();

        assert!(sender.emit(HuntEvent::Started {
            run_id,
            total_keywords: 3,
            published_after: "2025-11-20T08:15:00Z".to_string(),
        }));

        let event = rx.recv().await.expect("Should receive event");
        assert_eq!(event.run_id(), run_id);
        assert_eq!(event.type_name(), "started");
    }

    #[test]
    fn test_full_channel_drops_event() {
        let (sender, _rx) = hunt_event_channel(1);
        let run_id = Uuid::new_v4();
        let finished = HuntEvent::Finished {
            run_id,
            gems: 0,
            warnings: 0,
            duration_ms: 1,
        };

        assert!(sender.emit(finished.clone()));
        assert!(!sender.emit(finished));
    }

    #[test]
    fn test_closed_channel_drops_event() {
        let (sender, rx) = hunt_event_channel(4);
        drop(rx);
        assert!(!sender.emit(HuntEvent::Aborted {
            run_id: Uuid::new_v4(),
            keyword: "aita".to_string(),
            error: "quota".to_string(),
        }));
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = HuntEvent::Warning {
            run_id: Uuid::nil(),
            index: 2,
            total: 5,
            warning: KeywordWarning::no_results("aita"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["index"], 2);
        assert_eq!(json["warning"]["kind"], "no_results");
        assert_eq!(event.type_name(), "warning");
    }
}
