//! Transport layer for presentation clients.
//!
//! Provides:
//! - Wire protocol (tagged JSON)
//! - Message dispatch onto a `SessionOrchestrator`
//! - WebSocket transport (feature: websocket)

pub mod dispatch;
pub mod protocol;

#[cfg(feature = "websocket")]
pub mod websocket;

pub use dispatch::{dispatch, dispatch_text};
pub use protocol::{ClientMessage, ServerMessage};
