//! Maps client messages onto orchestrator calls.

use toolstack_core::RemoteClient;
use toolstack_session::SessionOrchestrator;
use tracing::warn;

use crate::protocol::{ClientMessage, ServerMessage};

/// Handle one client message against a session.
pub async fn dispatch<C: RemoteClient + ?Sized>(
    orchestrator: &mut SessionOrchestrator<C>,
    message: ClientMessage,
) -> ServerMessage {
    match message {
        ClientMessage::Connect => orchestrator.connect().await.into(),
        ClientMessage::Status => ServerMessage::Status {
            connected: orchestrator.is_connected(),
            model_id: orchestrator.model_id().cloned(),
        },
        ClientMessage::Chat { message } => ServerMessage::Reply {
            content: orchestrator.chat(&message).await,
        },
        ClientMessage::ListTools => ServerMessage::Tools {
            names: orchestrator.available_tools(),
        },
        ClientMessage::ListPlugins => ServerMessage::Plugins {
            plugins: orchestrator.list_plugins(),
        },
        ClientMessage::ListToolgroups => ServerMessage::Toolgroups {
            toolgroups: orchestrator.list_remote_toolgroups().await,
        },
        ClientMessage::RegisterTool {
            name,
            description,
            source,
        } => orchestrator
            .register_tool(&name, &description, &source)
            .into(),
        ClientMessage::RegisterPlugin {
            name,
            endpoint_url,
            description,
            auth_token,
        } => orchestrator
            .register_plugin(&name, &endpoint_url, &description, &auth_token)
            .await
            .into(),
        ClientMessage::UnregisterPlugin { name } => {
            orchestrator.unregister_plugin(&name).await.into()
        }
        ClientMessage::Ping => ServerMessage::Pong,
    }
}

/// Handle one raw text frame.
///
/// A frame that is not a valid [`ClientMessage`] yields
/// [`ServerMessage::Error`] and leaves the session untouched.
pub async fn dispatch_text<C: RemoteClient + ?Sized>(
    orchestrator: &mut SessionOrchestrator<C>,
    text: &str,
) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => dispatch(orchestrator, message).await,
        Err(e) => {
            warn!("Invalid client message: {e}");
            ServerMessage::Error {
                message: format!("Invalid message: {e}"),
            }
        }
    }
}
