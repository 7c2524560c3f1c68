pub mod handlers;
pub mod hunt;
pub mod middleware;
pub mod routes;
pub mod ws;

pub use middleware::metrics_middleware;
pub use routes::create_router;
pub use ws::{spawn_event_forwarder, WsBroadcaster, WsMessage};
