// ABOUTME: HTTP route handlers for the console page, health check and tweak queries
// ABOUTME: Serves listings as pretty-printed JSON and applies single-tweak updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

use crate::errors::{AppError, AppResult};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tracing::info;
use tweakkit_core::{EventSource, Registry, TweakInfo};

const CONSOLE_PAGE: &str = include_str!("console.html");

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// `GET /health`
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> &'static str {
        "OK"
    }
}

/// Console page, tweak listing and single-tweak access
pub struct TweakRoutes;

impl TweakRoutes {
    /// `GET /`, `GET /api/tweaks` and `GET`/`PUT /api/tweaks/:key`
    pub fn routes(registry: Registry) -> Router {
        Router::new()
            .route("/", get(Self::handle_console_page))
            .route("/api/tweaks", get(Self::handle_list_tweaks))
            .route(
                "/api/tweaks/:key",
                get(Self::handle_get_tweak).put(Self::handle_set_tweak),
            )
            .with_state(registry)
    }

    async fn handle_console_page() -> Html<&'static str> {
        Html(CONSOLE_PAGE)
    }

    async fn handle_list_tweaks(State(registry): State<Registry>) -> AppResult<Response> {
        pretty_json(&registry.snapshot(None))
    }

    async fn handle_get_tweak(
        State(registry): State<Registry>,
        Path(key): Path<String>,
    ) -> AppResult<Response> {
        pretty_json(&lookup(&registry, &key)?)
    }

    /// The request body is the new value in its text form
    async fn handle_set_tweak(
        State(registry): State<Registry>,
        Path(key): Path<String>,
        body: String,
    ) -> AppResult<Response> {
        lookup(&registry, &key)?;
        if let Some(event) = registry.set(&key, &body, EventSource::Web)? {
            info!(
                key = %event.key,
                old = %event.old_value,
                new = %event.new_value,
                "Tweak set over HTTP"
            );
        }
        pretty_json(&lookup(&registry, &key)?)
    }
}

fn lookup(registry: &Registry, key: &str) -> AppResult<TweakInfo> {
    registry
        .get(key)
        .map(|tweak| tweak.info())
        .ok_or_else(|| AppError::not_found(format!("No tweak with key: {key}")))
}

fn pretty_json<T: Serialize>(value: &T) -> AppResult<Response> {
    let body = serde_json::to_string_pretty(value)?;
    Ok((
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}
