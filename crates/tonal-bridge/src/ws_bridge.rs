//! WebSocket transport for method calls.
//!
//! Each text frame carries one JSON [`MethodCall`](crate::ipc::MethodCall);
//! the server answers on the same connection with one JSON
//! [`MethodResponse`](crate::ipc::MethodResponse). Clients are served
//! concurrently.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

use crate::handler::MethodHandler;

/// Errors from the WebSocket server.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind the listening socket.
pub async fn bind(addr: &str) -> Result<TcpListener, BridgeError> {
    TcpListener::bind(addr).await.map_err(|source| BridgeError::Bind {
        addr: addr.to_string(),
        source,
    })
}

/// Accept clients forever, serving each on its own task.
pub async fn serve(listener: TcpListener, handler: Arc<MethodHandler>) -> Result<(), BridgeError> {
    let local = listener.local_addr()?;
    tracing::info!("WebSocket method-call server listening on ws://{local}");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("failed to accept connection: {e}");
                continue;
            }
        };
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            handle_connection(stream, peer, handler).await;
        });
    }
}

/// Serve one client until it disconnects.
async fn handle_connection(stream: TcpStream, peer: SocketAddr, handler: Arc<MethodHandler>) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::error!("WebSocket handshake with {peer} failed: {e}");
            return;
        }
    };
    tracing::info!("WebSocket client connected: {peer}");

    let (mut ws_sink, mut ws_source) = ws_stream.split();
    while let Some(msg) = ws_source.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.to_string(),
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => {
                tracing::warn!("ignoring binary frame from {peer}");
                continue;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket error from {peer}: {e}");
                break;
            }
        };

        // Decode, transform and encode are CPU-bound; keep them off the reactor.
        let handler = Arc::clone(&handler);
        let reply = match tokio::task::spawn_blocking(move || handler.handle_json(&text)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("method call task failed: {e}");
                break;
            }
        };

        if ws_sink.send(Message::Text(reply.into())).await.is_err() {
            break;
        }
    }

    tracing::info!("WebSocket client disconnected: {peer}");
}
