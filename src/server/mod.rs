// ABOUTME: HTTP and WebSocket server exposing a tweak registry to remote consoles
// ABOUTME: Binds per network mode, installs the session broadcast observer and shuts down gracefully
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # TweakKit Server
//!
//! Routes:
//! - `GET /` console page
//! - `GET /health` plain-text `OK`
//! - `GET /api/tweaks` JSON listing of every tweak
//! - `GET /ws` WebSocket console speaking the command protocol

/// HTTP route handlers
pub mod routes;

/// WebSocket console
pub mod websocket;

use crate::command::CommandInterpreter;
use crate::config::ServerConfig;
use crate::constants::network::SHUTDOWN_GRACE;
use crate::errors::AppResult;
use crate::session::SessionTable;
use axum::Router;
use routes::{HealthRoutes, TweakRoutes};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tweakkit_core::{ObserverId, Registry};
use websocket::{ConsoleManager, ConsoleRoutes};

/// Serves one registry over HTTP and WebSocket
#[derive(Debug, Clone)]
pub struct TweakServer {
    registry: Registry,
    config: ServerConfig,
    sessions: SessionTable,
}

impl TweakServer {
    #[must_use]
    pub fn new(registry: Registry, config: ServerConfig) -> Self {
        Self {
            registry,
            config,
            sessions: SessionTable::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Complete application router
    #[must_use]
    pub fn router(&self) -> Router {
        let interpreter = CommandInterpreter::new(self.registry.clone(), self.sessions.clone());
        let manager = Arc::new(ConsoleManager::new(interpreter));

        Router::new()
            .merge(TweakRoutes::routes(self.registry.clone()))
            .merge(HealthRoutes::routes())
            .merge(ConsoleRoutes::routes(manager))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind, install the broadcast observer and start serving in the background.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub async fn start(&self) -> AppResult<ServerHandle> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let local_addr = listener.local_addr()?;

        let observer = self.sessions.attach(&self.registry);
        let router = self.router();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %e, "TweakKit server stopped with an error");
            }
        });

        info!(
            address = %local_addr,
            network_mode = %self.config.network_mode,
            "TweakKit server listening"
        );

        Ok(ServerHandle {
            local_addr,
            shutdown: Some(shutdown_tx),
            task,
            registry: self.registry.clone(),
            sessions: self.sessions.clone(),
            observer,
        })
    }
}

/// A running server
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    registry: Registry,
    sessions: SessionTable,
    observer: ObserverId,
}

impl ServerHandle {
    /// Address the listener is bound to
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Bound port; differs from the configured one when that was `0`
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.local_addr.port()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop accepting connections, detach from the registry and drop every session
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.sessions.detach(&self.registry, self.observer);
        self.sessions.clear();

        if time::timeout(SHUTDOWN_GRACE, &mut self.task).await.is_err() {
            warn!("TweakKit server did not stop in time, aborting");
            self.task.abort();
        }
        info!(address = %self.local_addr, "TweakKit server stopped");
    }
}
