//! Hidden gem hunting.
//!
//! For each keyword the pipeline searches recent videos, joins per-video and
//! per-channel statistics, derives views/day, engagement and viral score, and
//! keeps videos with enough views from channels small enough to count. The
//! merged result is ranked by viral score.
//!
//! Failures of a single keyword become warnings and the run continues. Quota
//! and credential failures abort the run.

mod events;
pub mod export;
mod pipeline;
mod types;

pub use events::{hunt_event_channel, HuntEvent, HuntEventSender};
pub use export::{to_csv_string, write_csv};
pub use pipeline::{align_window, published_after, GemHunter, HunterConfig};
pub use types::*;
