//! Real-time channel for aptitude sessions.
//!
//! - [`messages`] - JSON event protocol
//! - [`handler`] - axum upgrade handler and the per-event dispatcher

pub mod handler;
pub mod messages;

pub use handler::{
    dispatch, forward_outbound, greet, websocket_router, ws_handler, ChannelClosed,
    LiveSessionState,
};
pub use messages::{ClientMessage, ServerMessage};
