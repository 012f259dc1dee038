// ABOUTME: WebSocket console endpoint bridging socket frames to the command interpreter
// ABOUTME: Owns one session per connection and forwards its outbox to the socket
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

use crate::command::CommandInterpreter;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Runs console connections
pub struct ConsoleManager {
    interpreter: CommandInterpreter,
}

impl ConsoleManager {
    #[must_use]
    pub const fn new(interpreter: CommandInterpreter) -> Self {
        Self { interpreter }
    }

    /// Serve one connection until the client closes it.
    ///
    /// The connection gets a session for its lifetime. Command responses and
    /// watched events share the session outbox, so they reach the socket in
    /// the order they were produced.
    pub async fn handle_connection(&self, socket: WebSocket) {
        let (mut ws_tx, mut ws_rx) = socket.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let sessions = self.interpreter.sessions();
        let session = sessions.connect(tx.clone());

        let send_task = tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                if ws_tx.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        });

        if tx.send(CommandInterpreter::banner()).is_err() {
            warn!(session = %session, "Failed to queue console banner");
        }

        while let Some(message) = ws_rx.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let line = text.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let response = self.interpreter.respond(session, line);
                    if !response.is_empty() && tx.send(response).is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) | Err(_) => break,
                _ => {}
            }
        }

        sessions.disconnect(session);
        drop(tx);
        send_task.abort();
        debug!(session = %session, "Console connection closed");
    }
}

/// WebSocket console route
pub struct ConsoleRoutes;

impl ConsoleRoutes {
    /// `GET /ws`
    pub fn routes(manager: Arc<ConsoleManager>) -> Router {
        Router::new()
            .route("/ws", get(Self::handle_websocket))
            .with_state(manager)
    }

    async fn handle_websocket(
        ws: WebSocketUpgrade,
        State(manager): State<Arc<ConsoleManager>>,
    ) -> impl IntoResponse {
        info!("New console connection request");
        ws.on_upgrade(move |socket| async move {
            manager.handle_connection(socket).await;
        })
    }
}
