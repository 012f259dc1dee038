// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, a populated registry fixture and a console harness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `tweakkit`

use std::env;
use std::sync::{Arc, Once};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::Level;
use tweakkit::command::CommandInterpreter;
use tweakkit::session::{SessionId, SessionTable};
use tweakkit::{Constraints, Registry, Tweak};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Handles to the tweaks registered by [`demo_registry`]
pub struct DemoTweaks {
    pub speed: Arc<Tweak<f64>>,
    pub count: Arc<Tweak<i64>>,
    pub title: Arc<Tweak<String>>,
    pub enabled: Arc<Tweak<bool>>,
}

/// Registry with one tweak of each common kind
pub fn demo_registry() -> (Registry, DemoTweaks) {
    init_test_logging();
    let registry = Registry::new();
    let tweaks = DemoTweaks {
        speed: Tweak::new("physics.speed", 1.0_f64)
            .with_constraints(Constraints::new().range(0.0, 10.0).step(0.5))
            .register(&registry),
        count: Tweak::new("spawn.count", 10_i64)
            .with_constraints(Constraints::new().range(0, 100).step(5))
            .register(&registry),
        title: Tweak::new("ui.title", "Hello".to_owned()).register(&registry),
        enabled: Tweak::new("debug.enabled", false).register(&registry),
    };
    (registry, tweaks)
}

/// A console session wired to an interpreter, with its outbox receiver
pub struct ConsoleHarness {
    pub interpreter: CommandInterpreter,
    pub sessions: SessionTable,
    pub session: SessionId,
    pub outbox: UnboundedReceiver<String>,
}

impl ConsoleHarness {
    /// Connect one session to `registry` with broadcast attached
    pub fn new(registry: &Registry) -> Self {
        let sessions = SessionTable::new();
        sessions.attach(registry);
        let (tx, outbox) = mpsc::unbounded_channel();
        let session = sessions.connect(tx);
        Self {
            interpreter: CommandInterpreter::new(registry.clone(), sessions.clone()),
            sessions,
            session,
            outbox,
        }
    }

    /// Run a line for this session
    pub fn run(&self, line: &str) -> Vec<String> {
        self.interpreter.execute(self.session, line)
    }

    /// Everything pushed to this session so far
    pub fn drain(&mut self) -> Vec<String> {
        let mut pushed = Vec::new();
        while let Ok(line) = self.outbox.try_recv() {
            pushed.push(line);
        }
        pushed
    }
}
