// ABOUTME: Per-connection console sessions and change-event broadcast to watching sessions
// ABOUTME: Sends outside the table lock and drops sessions whose outbox has closed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # Console Sessions
//!
//! Every console connection owns one [`Session`] entry, keyed by a
//! [`SessionId`] issued at connect time. A session carries its `watch` state
//! and the sending half of the connection's outbox; the transport drains the
//! receiving half into the socket.
//!
//! Broadcasting snapshots the matching outboxes under the read lock and sends
//! after releasing it. Sessions whose outbox turned out to be closed are
//! removed afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};
use tweakkit_core::{ObserverId, Registry, TweakEvent};
use uuid::Uuid;

/// Connection identifier issued by [`SessionTable::connect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a session wants to be told about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchState {
    /// Whether change events are delivered at all
    pub is_watching: bool,
    /// Only deliver events for this key, when set
    pub watch_key: Option<String>,
}

impl WatchState {
    /// Whether an event for `key` should be delivered
    #[must_use]
    pub fn wants(&self, key: &str) -> bool {
        self.is_watching && self.watch_key.as_deref().is_none_or(|watched| watched == key)
    }
}

/// One live console connection
#[derive(Debug)]
pub struct Session {
    watch: WatchState,
    outbox: UnboundedSender<String>,
}

/// Shared table of live sessions
#[derive(Clone, Default)]
pub struct SessionTable {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl SessionTable {
    /// Empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session that is not watching anything
    pub fn connect(&self, outbox: UnboundedSender<String>) -> SessionId {
        let id = SessionId::new();
        self.write().insert(
            id,
            Session {
                watch: WatchState::default(),
                outbox,
            },
        );
        debug!(session = %id, "Console session connected");
        id
    }

    /// Remove a session; returns whether it was present
    pub fn disconnect(&self, id: SessionId) -> bool {
        let removed = self.write().remove(&id).is_some();
        if removed {
            debug!(session = %id, "Console session disconnected");
        }
        removed
    }

    /// Start watching every key, or only `key`. Returns false for an unknown session.
    pub fn watch(&self, id: SessionId, key: Option<String>) -> bool {
        self.update(id, WatchState {
            is_watching: true,
            watch_key: key,
        })
    }

    /// Stop watching. Returns false for an unknown session.
    pub fn unwatch(&self, id: SessionId) -> bool {
        self.update(id, WatchState::default())
    }

    fn update(&self, id: SessionId, watch: WatchState) -> bool {
        match self.write().get_mut(&id) {
            Some(session) => {
                session.watch = watch;
                true
            }
            None => false,
        }
    }

    /// Current watch state of a session
    #[must_use]
    pub fn watch_state(&self, id: SessionId) -> Option<WatchState> {
        self.read().get(&id).map(|session| session.watch.clone())
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every session
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Deliver the event line to every watching session that wants this key.
    ///
    /// Returns the number of sessions the line was delivered to.
    pub fn broadcast(&self, event: &TweakEvent) -> usize {
        let targets: Vec<(SessionId, UnboundedSender<String>)> = self
            .read()
            .iter()
            .filter(|(_, session)| session.watch.wants(&event.key) || session.outbox.is_closed())
            .map(|(id, session)| (*id, session.outbox.clone()))
            .collect();

        if targets.is_empty() {
            return 0;
        }

        let line = event.format_line();
        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, outbox) in targets {
            if outbox.is_closed() || outbox.send(line.clone()).is_err() {
                closed.push(id);
            } else {
                delivered += 1;
            }
        }

        if !closed.is_empty() {
            let mut sessions = self.write();
            for id in &closed {
                sessions.remove(id);
            }
            drop(sessions);
            debug!(removed = closed.len(), "Dropped closed console sessions");
        }

        trace!(key = %event.key, delivered, "Broadcast tweak event");
        delivered
    }

    /// Install [`SessionTable::broadcast`] as a registry observer
    pub fn attach(&self, registry: &Registry) -> ObserverId {
        let table = self.clone();
        registry.add_observer(move |event| {
            table.broadcast(event);
        })
    }

    /// Remove an observer installed by [`SessionTable::attach`]
    pub fn detach(&self, registry: &Registry, observer: ObserverId) -> bool {
        registry.remove_observer(observer)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.read().unwrap_or_else(|poisoned| {
            warn!("Session table lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.write().unwrap_or_else(|poisoned| {
            warn!("Session table lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl fmt::Debug for SessionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTable")
            .field("sessions", &self.len())
            .finish()
    }
}
