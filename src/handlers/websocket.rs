use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{error, info, warn};
use tokio::sync::mpsc;
use warp::ws::WebSocket;

use crate::config::ServerConfig;
use crate::constants::MAX_USER_ID_LENGTH;
use crate::core::push::SharedPushService;

// Handle a WebSocket connection for the user resolved from the URL path
pub async fn handle_ws_client(
    ws: WebSocket,
    user_id: String,
    push: SharedPushService,
    config: ServerConfig,
) {
    if user_id.is_empty() || user_id.len() > MAX_USER_ID_LENGTH {
        warn!("Rejecting connection with invalid user id");
        let _ = ws.close().await;
        return;
    }

    if push.active_count().await >= config.max_connections {
        warn!("Rejecting connection for user {}: connection limit reached", user_id);
        let _ = ws.close().await;
        return;
    }

    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Forward queued outbound messages into the socket. The queue receiver
    // lives here; when this task ends the connection reads as closed.
    tokio::task::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
    });

    // Register the connection
    let registry = push.registry().clone();
    let connection = registry.register(user_id.clone(), tx).await;
    let total = registry.len().await;
    push.observer().connection_opened(total).await;
    info!("User {} connected, total connections: {}", user_id, total);

    // Handle incoming messages. This is a push channel: receipt is logged,
    // nothing else happens with the payload.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                if let Ok(text) = msg.to_str() {
                    if text.len() > config.max_message_size {
                        warn!(
                            "Dropping oversized message from user {} ({} bytes)",
                            user_id,
                            text.len()
                        );
                        continue;
                    }
                    info!("Received message from user {}: {}", user_id, text);
                }
            }
            Err(e) => {
                error!("WebSocket error for user {}: {}", user_id, e);
                break;
            }
        }
    }

    // Client disconnected
    registry.unregister(&connection).await;
    let total = registry.len().await;
    push.observer().connection_closed(total).await;
    info!("User {} disconnected, total connections: {}", user_id, total);
}
