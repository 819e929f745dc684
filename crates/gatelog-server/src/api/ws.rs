//! WebSocket endpoint for live scan updates.
//!
//! The admin dashboard and the landing display connect here and receive
//! every accepted scan as a topic-tagged JSON envelope (`new-scan` and
//! `scan-status`, see [`gatelog_core::ScanNotice`]). Delivery is
//! best-effort: a client that lags or reconnects re-fetches current state
//! through the reporting endpoints instead of expecting replay.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gatelog_core::ScanNotice;

use crate::state::SharedState;

/// WebSocket upgrade handler for `/api/ws`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forward scan notifications to one connected observer.
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let client_id = Uuid::new_v4();
    // Subscribe before anything else so no accepted scan slips between
    // upgrade and subscription.
    let mut notices = state.broadcaster().subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!(%client_id, "observer connected");

    loop {
        tokio::select! {
            notice = notices.recv() => match notice {
                Ok(notice) => {
                    if !forward(&mut sender, &notice).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // The client fell behind the ring buffer; it will
                    // reconcile via a full refresh.
                    warn!(%client_id, skipped, "observer lagged, notifications dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    // Keepalive handled by axum
                }
                Some(Ok(_)) => {
                    // Observers are read-only; inbound payloads are ignored
                    debug!(%client_id, "ignoring inbound message from observer");
                }
            },
        }
    }

    info!(%client_id, "observer disconnected");
}

/// Serialize and send one notice. Returns `false` once the socket is gone.
async fn forward(
    sender: &mut (impl SinkExt<Message> + Unpin),
    notice: &ScanNotice,
) -> bool {
    match serde_json::to_string(notice) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "failed to serialize scan notice");
            true
        }
    }
}
