// ABOUTME: System-wide constants for the TweakKit server and command console
// ABOUTME: Network defaults, environment variable names and console text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # Constants Module
//!
//! Defaults and fixed strings shared by configuration, the console and the
//! HTTP transport.

/// Service identity used in logs
pub mod service_names {
    /// Name of the server binary and logging service
    pub const TWEAKKIT_SERVER: &str = "tweakkit-server";
}

/// Network defaults
pub mod network {
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    /// Port used when `TWEAKKIT_PORT` is unset
    pub const DEFAULT_PORT: u16 = 8080;

    /// Bind address for localhost-only mode
    pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Bind address for LAN mode
    pub const ALL_INTERFACES: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

    /// How long `stop` waits for in-flight requests before aborting the serve task
    pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
}

/// Environment variable names
pub mod env_config {
    /// Listening port
    pub const PORT: &str = "TWEAKKIT_PORT";
    /// `localhost` or `lan`
    pub const NETWORK_MODE: &str = "TWEAKKIT_NETWORK_MODE";
    /// Number of change events retained by the registry
    pub const HISTORY_CAPACITY: &str = "TWEAKKIT_HISTORY_CAPACITY";
    /// Log output format: `pretty`, `json` or `compact`
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Log filter directives
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Console text
pub mod console {
    /// Lines sent to every new console connection
    pub const BANNER_LINES: [&str; 3] = ["TweakKit Server", "Type 'help' for commands.", ""];

    /// Response to `help`
    pub const HELP_LINES: [&str; 10] = [
        "Commands:",
        "  help",
        "  list [filter]",
        "  get <key>",
        "  set <key> <value>",
        "  reset <key>",
        "  reset-all",
        "  last",
        "  history [n]",
        "  watch [key] | watch off",
    ];

    /// Events shown by `history` without an argument
    pub const DEFAULT_HISTORY_LINES: usize = 10;

    /// `list` found nothing
    pub const NO_TWEAKS_FOUND: &str = "No tweaks found.";
    /// `last` before any change was recorded
    pub const NO_TWEAKS_YET: &str = "No tweaks yet.";
    /// `history` with an empty history
    pub const NO_HISTORY: &str = "No history.";
    /// `watch off`
    pub const WATCH_DISABLED: &str = "Watch disabled";
    /// `watch` without a key
    pub const WATCHING_ALL: &str = "Watching all tweaks";
}
