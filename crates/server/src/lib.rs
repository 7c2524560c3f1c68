//! HTTP API for the gem hunter.
//!
//! Exposes hunts as JSON and CSV, live hunt events over a WebSocket, the
//! search cache and prometheus metrics.

pub mod api;
pub mod metrics;
pub mod state;
