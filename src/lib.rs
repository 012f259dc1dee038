// ABOUTME: Main library entry point for the TweakKit live tweak server
// ABOUTME: Provides the command console, session broadcast, HTTP/WebSocket transport and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

#![deny(unsafe_code)]

//! # TweakKit
//!
//! Remote console for runtime tweaks. The typed tweaks, constraints and the
//! registry live in [`tweakkit_core`]; this crate exposes a registry over a
//! line-oriented command protocol carried by WebSocket, plus a small HTTP
//! surface for health checks and listings.
//!
//! ## Modules
//!
//! - **command**: tokenizer, command grammar and interpreter
//! - **session**: per-connection watch state and event broadcast
//! - **server**: axum routes, WebSocket console and server lifecycle
//! - **config**: environment-driven configuration
//! - **logging**: tracing subscriber setup
//! - **errors**: `AppError` with HTTP status mapping
//!
//! ## Example
//!
//! ```rust,no_run
//! use tweakkit::config::ServerConfig;
//! use tweakkit::server::TweakServer;
//! use tweakkit::{Constraints, Registry, Tweak};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::new();
//! let speed = Tweak::new("physics.speed", 1.0_f64)
//!     .with_constraints(Constraints::new().range(0.0, 10.0).step(0.5))
//!     .register(&registry);
//!
//! let handle = TweakServer::new(registry, ServerConfig::default()).start().await?;
//! println!("speed is {} on port {}", speed.value(), handle.port());
//! handle.stop().await;
//! # Ok(())
//! # }
//! ```

/// Console command parsing and execution
pub mod command;

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// Application error types
pub mod errors;

/// Logging setup
pub mod logging;

/// HTTP and WebSocket transport
pub mod server;

/// Console sessions and event broadcast
pub mod session;

/// Core tweak types, re-exported for downstream crates
pub use tweakkit_core as core;

pub use tweakkit_core::{
    AnyTweak, ConstraintInfo, Constraints, EventSource, ObserverId, Registry, Tweak, TweakError,
    TweakEvent, TweakInfo, TweakValue,
};
