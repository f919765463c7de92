use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// Live refresh channel. Browsers cannot set headers on a websocket
/// handshake, so the access token rides in the query string.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Response {
    let user_id = match authenticate_ws(&state, query.token.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("WebSocket auth failed: {}", e);
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

fn authenticate_ws(state: &AppState, token: Option<&str>) -> Result<Uuid, &'static str> {
    let token = token.ok_or("Missing token query parameter")?;
    let token_data = verify_token(token, &state.config).map_err(|_| "Invalid or expired token")?;
    Ok(token_data.claims.sub)
}

/// Only messages addressed to `user_id` get through.
fn is_for_user(msg: &str, user_id: Uuid) -> bool {
    serde_json::from_str::<serde_json::Value>(msg)
        .ok()
        .and_then(|v| v.get("user_id").and_then(|u| u.as_str()).map(str::to_owned))
        .is_some_and(|target| target == user_id.to_string())
}

/// Next broadcast addressed to `user_id`. A receiver that fell behind skips
/// the dropped messages and keeps going; `None` once the channel is closed.
async fn next_for_user(rx: &mut broadcast::Receiver<String>, user_id: Uuid) -> Option<String> {
    loop {
        match rx.recv().await {
            Ok(msg) if is_for_user(&msg, user_id) => return Some(msg),
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(user_id = %user_id, skipped = skipped, "WebSocket receiver lagged");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: Uuid) {
    let (mut sender, mut receiver) = socket.split();

    let Some(mut rx) = state.ws_tx.as_ref().map(|tx| tx.subscribe()) else {
        tracing::warn!("WebSocket broadcast channel not initialized; closing");
        let _ = sender.send(Message::Close(None)).await;
        return;
    };

    tracing::debug!(user_id = %user_id, "WebSocket connection established");

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = next_for_user(&mut rx, user_id).await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(user_id = %user_id, "WebSocket connection closed");
}
