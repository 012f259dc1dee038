// ABOUTME: Bounded, insertion-ordered log of tweak change events
// ABOUTME: Evicts the oldest events first once the capacity is exceeded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

use crate::event::TweakEvent;
use std::collections::VecDeque;

/// Default number of events retained by a registry
pub const HISTORY_CAPACITY: usize = 100;

/// Capped FIFO log of events
#[derive(Debug, Clone)]
pub struct History {
    events: VecDeque<TweakEvent>,
    capacity: usize,
}

impl History {
    /// Empty history holding at most `capacity` events (at least one)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, evicting from the front past capacity
    pub fn push(&mut self, event: TweakEvent) {
        self.events.push_back(event);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }

    /// Most recent event
    #[must_use]
    pub fn last(&self) -> Option<&TweakEvent> {
        self.events.back()
    }

    /// The last `count` events, oldest first
    #[must_use]
    pub fn tail(&self, count: usize) -> Vec<TweakEvent> {
        let skip = self.events.len().saturating_sub(count);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &TweakEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventSource;

    fn event(index: usize) -> TweakEvent {
        TweakEvent::new("k", index.to_string(), (index + 1).to_string(), EventSource::Code)
    }

    #[test]
    fn test_overflow_keeps_newest_in_order() {
        let mut history = History::default();
        for index in 0..250 {
            history.push(event(index));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        let olds: Vec<String> = history.iter().map(|e| e.old_value.clone()).collect();
        let expected: Vec<String> = (150..250).map(|i: usize| i.to_string()).collect();
        assert_eq!(olds, expected);
        assert_eq!(history.last().map(|e| e.old_value.as_str()), Some("249"));
    }

    #[test]
    fn test_tail_clamps_to_length() {
        let mut history = History::with_capacity(5);
        history.push(event(0));
        history.push(event(1));

        assert_eq!(history.tail(10).len(), 2);
        assert_eq!(history.tail(1)[0].old_value, "1");
        assert!(history.tail(0).is_empty());
    }

    #[test]
    fn test_zero_capacity_still_keeps_latest() {
        let mut history = History::with_capacity(0);
        history.push(event(0));
        history.push(event(1));
        assert_eq!(history.len(), 1);
        assert_eq!(history.capacity(), 1);
    }
}
