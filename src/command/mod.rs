// ABOUTME: Line-oriented console that reads and changes tweaks by key
// ABOUTME: Executes parsed commands against the registry and a session's watch state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # Command Console
//!
//! Text in, text out. Every command produces a finite list of lines which
//! transports join with `\n` into a single response. Failures never escape as
//! errors: usage problems become a usage line and registry failures become an
//! `Error: <reason>` line, with registry state untouched.

/// Tokenizer and command grammar
pub mod parser;

pub use parser::{Command, CommandError, CommandParser};

use crate::constants::console::{
    BANNER_LINES, HELP_LINES, NO_HISTORY, NO_TWEAKS_FOUND, NO_TWEAKS_YET, WATCHING_ALL,
    WATCH_DISABLED,
};
use crate::session::{SessionId, SessionTable};
use tracing::debug;
use tweakkit_core::{AnyTweak, EventSource, Registry, TweakEvent};

/// Executes console commands for sessions of a [`SessionTable`]
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    registry: Registry,
    sessions: SessionTable,
}

impl CommandInterpreter {
    #[must_use]
    pub const fn new(registry: Registry, sessions: SessionTable) -> Self {
        Self { registry, sessions }
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Greeting sent when a console connects
    #[must_use]
    pub fn banner() -> String {
        BANNER_LINES.join("\n")
    }

    /// Run one console line for `session`; blank input yields no lines
    pub fn execute(&self, session: SessionId, line: &str) -> Vec<String> {
        match Command::from_line(line) {
            Ok(Some(command)) => {
                debug!(session = %session, command = ?command, "Executing console command");
                self.run(session, command)
            }
            Ok(None) => Vec::new(),
            Err(e) => vec![e.to_string()],
        }
    }

    /// [`CommandInterpreter::execute`] joined into a single response
    pub fn respond(&self, session: SessionId, line: &str) -> String {
        self.execute(session, line).join("\n")
    }

    fn run(&self, session: SessionId, command: Command) -> Vec<String> {
        match command {
            Command::Help => HELP_LINES.iter().map(|line| (*line).to_owned()).collect(),
            Command::List { filter } => self.list_lines(filter.as_deref()),
            Command::Get { key } => vec![self.registry.get(&key).map_or_else(
                || format!("No tweak with key: {key}"),
                |tweak| describe(tweak.as_ref()),
            )],
            Command::Set { key, value } => {
                vec![match self.registry.set(&key, &value, EventSource::Web) {
                    Ok(_) => format!("Set {key} to {value}"),
                    Err(e) => format!("Error: {e}"),
                }]
            }
            Command::Reset { key } => vec![match self.registry.reset(&key, EventSource::Web) {
                Ok(_) => format!("Reset {key}"),
                Err(e) => format!("Error: {e}"),
            }],
            Command::ResetAll => {
                let count = self.registry.reset_all(EventSource::Web);
                vec![format!("Reset {count} tweaks")]
            }
            Command::Last => vec![self
                .registry
                .last_event()
                .map_or_else(|| NO_TWEAKS_YET.to_owned(), |event| event.format_line())],
            Command::History { limit } => {
                let events = self.registry.history_tail(limit);
                if events.is_empty() {
                    vec![NO_HISTORY.to_owned()]
                } else {
                    events.iter().map(TweakEvent::format_line).collect()
                }
            }
            Command::Watch { key } => {
                let response = key
                    .as_ref()
                    .map_or_else(|| WATCHING_ALL.to_owned(), |key| format!("Watching {key}"));
                if !self.sessions.watch(session, key) {
                    debug!(session = %session, "watch for a session that is not connected");
                }
                vec![response]
            }
            Command::Unwatch => {
                self.sessions.unwatch(session);
                vec![WATCH_DISABLED.to_owned()]
            }
        }
    }

    fn list_lines(&self, filter: Option<&str>) -> Vec<String> {
        let tweaks = self.registry.list(filter);
        if tweaks.is_empty() {
            return vec![NO_TWEAKS_FOUND.to_owned()];
        }
        tweaks.iter().map(|tweak| describe(tweak.as_ref())).collect()
    }
}

fn describe(tweak: &dyn AnyTweak) -> String {
    tweak.info().describe()
}
