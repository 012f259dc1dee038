// ABOUTME: Concurrent owner of all tweaks, the change history and the observer set
// ABOUTME: Serializes mutations, records change events and notifies observers after unlocking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # Tweak Registry
//!
//! The registry is the single point of mutation for tweaks. A mutation runs
//! while holding the registry's state lock: the tweak is updated and, when its
//! display value changed, an event is appended to the history and becomes the
//! last event. Observer handlers are collected under the same lock but only
//! invoked after it is released, so a handler can call back into
//! [`Registry::get`], [`Registry::list`] or even [`Registry::set`].
//!
//! There is no process-wide instance. Construct one registry at the
//! application's composition root and hand clones of it to tweaks and
//! transports.

use crate::errors::TweakError;
use crate::event::{EventSource, TweakEvent};
use crate::history::{History, HISTORY_CAPACITY};
use crate::tweak::sealed::Mutate;
use crate::tweak::{AnyTweak, TweakInfo, ValueChange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ptr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Callback invoked with every recorded event
pub type ObserverHandler = Arc<dyn Fn(&TweakEvent) + Send + Sync>;

/// Handle returned by [`Registry::add_observer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

struct RegistryState {
    tweaks: HashMap<String, Arc<dyn AnyTweak>>,
    history: History,
    last_event: Option<TweakEvent>,
    observers: HashMap<ObserverId, ObserverHandler>,
}

impl RegistryState {
    fn tweak(&self, key: &str) -> Result<Arc<dyn AnyTweak>, TweakError> {
        self.tweaks
            .get(key)
            .cloned()
            .ok_or_else(|| TweakError::unknown_key(key))
    }

    /// Whether `tweak` itself, not just a tweak with the same key, is registered
    fn holds(&self, tweak: &dyn AnyTweak) -> bool {
        self.tweaks
            .get(tweak.key())
            .is_some_and(|stored| ptr::addr_eq(Arc::as_ptr(stored), ptr::from_ref(tweak)))
    }

    /// Append to history, update the last event and snapshot the observers
    fn append(&mut self, event: TweakEvent) -> Vec<ObserverHandler> {
        self.history.push(event.clone());
        self.last_event = Some(event);
        self.observers.values().cloned().collect()
    }
}

struct RegistryInner {
    state: RwLock<RegistryState>,
}

/// Shared, thread-safe registry of tweaks
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

/// Non-owning registry link held by registered tweaks
#[derive(Clone)]
pub(crate) struct WeakRegistry(Weak<RegistryInner>);

impl WeakRegistry {
    pub(crate) fn upgrade(&self) -> Option<Registry> {
        self.0.upgrade().map(|inner| Registry { inner })
    }
}

impl Registry {
    /// Empty registry retaining the default number of history events
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_capacity(HISTORY_CAPACITY)
    }

    /// Empty registry retaining at most `capacity` history events
    #[must_use]
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                state: RwLock::new(RegistryState {
                    tweaks: HashMap::new(),
                    history: History::with_capacity(capacity),
                    last_event: None,
                    observers: HashMap::new(),
                }),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakRegistry {
        WeakRegistry(Arc::downgrade(&self.inner))
    }

    /// Insert a tweak under its key. A tweak already registered under the same
    /// key is replaced and returned.
    pub fn register(&self, tweak: Arc<dyn AnyTweak>) -> Option<Arc<dyn AnyTweak>> {
        let key = tweak.key().to_owned();
        let type_name = tweak.type_name();
        let replaced = self.write_state().tweaks.insert(key.clone(), tweak);

        if replaced.is_some() {
            warn!(key = %key, "Tweak key registered twice, replacing previous tweak");
        } else {
            debug!(key = %key, r#type = type_name, "Registered tweak");
        }
        replaced
    }

    /// Remove a tweak. History entries for it are kept.
    pub fn unregister(&self, key: &str) -> Option<Arc<dyn AnyTweak>> {
        let removed = self.write_state().tweaks.remove(key);
        if removed.is_some() {
            debug!(key = %key, "Unregistered tweak");
        }
        removed
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<dyn AnyTweak>> {
        self.read_state().tweaks.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.read_state().tweaks.contains_key(key)
    }

    /// Number of registered tweaks
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_state().tweaks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_state().tweaks.is_empty()
    }

    /// Tweaks whose key contains `filter` case-insensitively, sorted by key.
    /// A missing or empty filter matches every tweak.
    #[must_use]
    pub fn list(&self, filter: Option<&str>) -> Vec<Arc<dyn AnyTweak>> {
        let all: Vec<Arc<dyn AnyTweak>> = self.read_state().tweaks.values().cloned().collect();

        let needle = filter
            .filter(|filter| !filter.is_empty())
            .map(str::to_lowercase);
        let mut matching: Vec<Arc<dyn AnyTweak>> = match needle {
            Some(needle) => all
                .into_iter()
                .filter(|tweak| tweak.key().to_lowercase().contains(&needle))
                .collect(),
            None => all,
        };
        matching.sort_by(|a, b| a.key().cmp(b.key()));
        matching
    }

    /// Listing records for [`Registry::list`]
    #[must_use]
    pub fn snapshot(&self, filter: Option<&str>) -> Vec<TweakInfo> {
        self.list(filter).iter().map(|tweak| tweak.info()).collect()
    }

    /// Parse and apply `value` to the tweak under `key`.
    ///
    /// Returns the recorded event, or `None` when the display value did not change.
    ///
    /// # Errors
    ///
    /// Returns [`TweakError::InvalidValue`] for an unknown key or unparsable
    /// value, and the validation error when the value violates constraints.
    pub fn set(
        &self,
        key: &str,
        value: &str,
        source: EventSource,
    ) -> Result<Option<TweakEvent>, TweakError> {
        debug!(key = %key, value = %value, source = %source, "Setting tweak");
        self.mutate(key, source, |state| {
            state.tweak(key)?.set_from_string(value).map(Some)
        })
    }

    /// Clear the override of the tweak under `key`.
    ///
    /// Returns the recorded event, or `None` when nothing visibly changed.
    ///
    /// # Errors
    ///
    /// Returns [`TweakError::InvalidValue`] for an unknown key.
    pub fn reset(&self, key: &str, source: EventSource) -> Result<Option<TweakEvent>, TweakError> {
        debug!(key = %key, source = %source, "Resetting tweak");
        self.mutate(key, source, |state| Ok(state.tweak(key)?.reset()))
    }

    /// Reset every tweak; returns how many display values actually changed
    pub fn reset_all(&self, source: EventSource) -> usize {
        self.list(None)
            .iter()
            .filter(|tweak| matches!(self.reset(tweak.key(), source), Ok(Some(_))))
            .count()
    }

    /// Apply a typed mutation of `tweak` inside the registry's critical
    /// section. A handle that was replaced or unregistered is still updated,
    /// but its change is not recorded.
    pub(crate) fn commit<F>(
        &self,
        tweak: &dyn AnyTweak,
        source: EventSource,
        mutation: F,
    ) -> Result<Option<TweakEvent>, TweakError>
    where
        F: FnOnce() -> Result<Option<ValueChange>, TweakError>,
    {
        let key = tweak.key();
        self.mutate(key, source, |state| {
            let change = mutation()?;
            if change.is_some() && !state.holds(tweak) {
                debug!(key = %key, "Detached tweak handle changed, not recording");
                return Ok(None);
            }
            Ok(change)
        })
    }

    fn mutate<F>(
        &self,
        key: &str,
        source: EventSource,
        mutation: F,
    ) -> Result<Option<TweakEvent>, TweakError>
    where
        F: FnOnce(&RegistryState) -> Result<Option<ValueChange>, TweakError>,
    {
        let (event, handlers) = {
            let mut state = self.write_state();
            let change = match mutation(&*state)? {
                Some(change) if change.is_observable() => change,
                _ => return Ok(None),
            };
            let event = TweakEvent::new(key, change.old, change.new, source);
            let handlers = state.append(event.clone());
            (event, handlers)
        };

        Self::notify(&event, &handlers);
        Ok(Some(event))
    }

    /// Append an event to the history, make it the last event and notify
    /// every observer
    pub fn record(&self, event: TweakEvent) {
        let handlers = self.write_state().append(event.clone());
        Self::notify(&event, &handlers);
    }

    fn notify(event: &TweakEvent, handlers: &[ObserverHandler]) {
        trace!(
            key = %event.key,
            observers = handlers.len(),
            "Dispatching tweak event"
        );
        for handler in handlers {
            handler(event);
        }
    }

    /// Register a handler for every recorded event
    pub fn add_observer<F>(&self, handler: F) -> ObserverId
    where
        F: Fn(&TweakEvent) + Send + Sync + 'static,
    {
        let id = ObserverId::new();
        self.write_state().observers.insert(id, Arc::new(handler));
        debug!(observer = %id, "Added tweak observer");
        id
    }

    /// Remove a handler; returns whether it was registered
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let removed = self.write_state().observers.remove(&id).is_some();
        if removed {
            debug!(observer = %id, "Removed tweak observer");
        }
        removed
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.read_state().observers.len()
    }

    /// Most recently recorded event
    #[must_use]
    pub fn last_event(&self) -> Option<TweakEvent> {
        self.read_state().last_event.clone()
    }

    /// Full history, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<TweakEvent> {
        self.read_state().history.iter().cloned().collect()
    }

    /// The last `count` events, oldest first
    #[must_use]
    pub fn history_tail(&self, count: usize) -> Vec<TweakEvent> {
        self.read_state().history.tail(count)
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.read_state().history.len()
    }

    #[must_use]
    pub fn history_capacity(&self) -> usize {
        self.read_state().history.capacity()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.inner.state.read().unwrap_or_else(|poisoned| {
            warn!("Tweak registry lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.inner.state.write().unwrap_or_else(|poisoned| {
            warn!("Tweak registry lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("Registry")
            .field("tweaks", &state.tweaks.len())
            .field("history", &state.history.len())
            .field("observers", &state.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweak::Tweak;

    #[test]
    fn test_registry_link_is_weak() {
        let registry = Registry::new();
        let tweak = Tweak::new("x", 1_i64).register(&registry);
        drop(registry);

        // No registry left to record in; the typed set still applies
        assert!(tweak.set(3, EventSource::Code).is_ok());
        assert_eq!(tweak.value(), 3);
    }

    #[test]
    fn test_observer_can_reenter_registry() {
        let registry = Registry::new();
        Tweak::new("a", 0_i64).register(&registry);
        Tweak::new("b", 0_i64).register(&registry);

        let inner = registry.clone();
        registry.add_observer(move |event| {
            if event.key == "a" {
                let _ = inner.list(None);
                let _ = inner.set("b", &event.new_value, EventSource::Code);
            }
        });

        registry.set("a", "7", EventSource::Web).unwrap();
        assert_eq!(registry.get("b").unwrap().current_value_string(), "7");
        assert_eq!(registry.history_len(), 2);
    }

    #[test]
    fn test_holds_compares_identity_not_key() {
        let registry = Registry::new();
        let first = Tweak::new("k", 1_i64).register(&registry);
        let second = Tweak::new("k", 2_i64).register(&registry);

        let state = registry.read_state();
        assert!(state.holds(&*second));
        assert!(!state.holds(&*first));
        assert!(!state.holds(&Tweak::new("other", 0_i64)));
    }
}
