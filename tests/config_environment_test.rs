// ABOUTME: Unit tests for environment-driven server configuration
// ABOUTME: Validates defaults, overrides and CONFIG_INVALID errors for bad values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use tweakkit::config::{NetworkMode, ServerConfig};
use tweakkit::errors::ErrorCode;
use tweakkit::logging::LogFormat;

const VARS: [&str; 4] = [
    "TWEAKKIT_PORT",
    "TWEAKKIT_NETWORK_MODE",
    "TWEAKKIT_HISTORY_CAPACITY",
    "LOG_FORMAT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.network_mode, NetworkMode::LocalhostOnly);
    assert_eq!(config.history_capacity, 100);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("TWEAKKIT_PORT", "9123");
    env::set_var("TWEAKKIT_NETWORK_MODE", "lan");
    env::set_var("TWEAKKIT_HISTORY_CAPACITY", "25");
    env::set_var("LOG_FORMAT", "json");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.port, 9123);
    assert_eq!(config.network_mode, NetworkMode::Lan);
    assert_eq!(config.history_capacity, 25);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9123");
}

#[test]
#[serial]
fn test_invalid_port_is_rejected() {
    clear_env();
    env::set_var("TWEAKKIT_PORT", "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains("TWEAKKIT_PORT"));
}

#[test]
#[serial]
fn test_invalid_network_mode_is_rejected() {
    clear_env();
    env::set_var("TWEAKKIT_NETWORK_MODE", "internet");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains("internet"));
}

#[test]
#[serial]
fn test_zero_history_capacity_is_rejected() {
    clear_env();
    env::set_var("TWEAKKIT_HISTORY_CAPACITY", "0");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
fn test_summary_mentions_settings() {
    let summary = ServerConfig::default().summary();
    assert!(summary.contains("Port: 8080"));
    assert!(summary.contains("Network Mode: localhost (127.0.0.1)"));
    assert!(summary.contains("History Capacity: 100"));
}
