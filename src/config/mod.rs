// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! Configuration module for the TweakKit server
//!
//! All settings come from environment variables; the binary layers its
//! command-line overrides on top.

/// Environment and server configuration
pub mod environment;

pub use environment::{NetworkMode, ServerConfig};
