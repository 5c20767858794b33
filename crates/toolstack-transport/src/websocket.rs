//! WebSocket transport: one orchestrator session per socket.

use std::sync::Arc;

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use toolstack_core::RemoteClient;
use toolstack_session::SessionHost;

use crate::{dispatch::dispatch_text, protocol::ServerMessage};

/// WebSocket handler state.
pub struct WsState<C: RemoteClient + ?Sized> {
    /// Host owning the per-socket sessions.
    pub host: Arc<SessionHost<C>>,
}

impl<C: RemoteClient + ?Sized> Clone for WsState<C> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

impl<C: RemoteClient + ?Sized> WsState<C> {
    /// Create new WebSocket state.
    #[must_use]
    pub const fn new(host: Arc<SessionHost<C>>) -> Self {
        Self { host }
    }
}

/// WebSocket upgrade handler.
///
/// Use this as an Axum route handler.
pub async fn ws_handler<C>(
    ws: WebSocketUpgrade,
    State(state): State<WsState<C>>,
) -> impl IntoResponse
where
    C: RemoteClient + ?Sized + 'static,
{
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket<C>(socket: WebSocket, state: WsState<C>)
where
    C: RemoteClient + ?Sized + 'static,
{
    let (mut sender, mut receiver) = socket.split();
    let (session_id, orchestrator) = state.host.open().await;

    // Channel for sending messages to the client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(j) => j,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {e}");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.as_str().to_owned(),
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(s) => s,
                Err(_) => continue,
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("WebSocket error: {e}");
                break;
            }
        };

        let reply = {
            let mut orchestrator = orchestrator.lock().await;
            dispatch_text(&mut orchestrator, &text).await
        };
        if tx.send(reply).is_err() {
            break;
        }
    }

    drop(tx);
    let _ = send_task.await;
    state.host.close(session_id).await;
    tracing::info!("WebSocket closed, session {session_id} released");
}

/// Create WebSocket router.
///
/// # Example
/// ```ignore
/// let host = Arc::new(SessionHost::new(client, config));
/// let app = Router::new().merge(create_ws_router(host));
/// ```
#[must_use]
pub fn create_ws_router<C>(host: Arc<SessionHost<C>>) -> axum::Router
where
    C: RemoteClient + ?Sized + 'static,
{
    axum::Router::new()
        .route("/ws", axum::routing::get(ws_handler::<C>))
        .with_state(WsState::new(host))
}
