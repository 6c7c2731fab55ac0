//! WebSocket gateway: per-connection dispatch between clients and the game.
//!
//! The gateway holds no game state. Each connection gets an opaque id, an
//! outbound queue drained by a spawned write task, and a read loop that
//! processes one inbound event to completion before the next.

use crate::protocol::ClientEvent;
use crate::server::AppState;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Handles `GET /ws`, upgrading the connection into the game protocol.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    info!(connection_id = %connection_id, "Client connected");

    let mut outbound = state.registry.register(connection_id.clone());
    let (mut sink, mut stream) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(json) = outbound.recv().await {
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => dispatch(&state, &connection_id, &text),
            Ok(Message::Close(_)) | Err(_) => break,
            // Pings and pongs are handled by axum; binary frames are not
            // part of the protocol.
            Ok(_) => {}
        }
    }

    info!(connection_id = %connection_id, "Client disconnected");
    state.registry.remove(&connection_id);
    state.matchmaker.disconnect(&connection_id);
    writer.abort();
}

/// Routes one inbound frame to the matchmaker or the owning session.
fn dispatch(state: &AppState, connection_id: &str, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::Join { display_name }) => {
            state.matchmaker.request_join(connection_id, &display_name);
        }
        Ok(ClientEvent::Answer { answer }) => {
            match state.matchmaker.session_for(connection_id) {
                Some(session) => session.submit_answer(connection_id, &answer),
                None => debug!(connection_id = %connection_id, "answer from a connection with no session"),
            }
        }
        Ok(ClientEvent::Move { row, col, symbol }) => {
            match state.matchmaker.session_for(connection_id) {
                Some(session) => session.apply_move(connection_id, row, col, symbol),
                None => debug!(connection_id = %connection_id, "move from a connection with no session"),
            }
        }
        Err(error) => {
            warn!(connection_id = %connection_id, %error, "Ignoring malformed client frame");
        }
    }
}
