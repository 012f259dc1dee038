// ABOUTME: Named, typed, runtime-overridable values and their type-erased interface
// ABOUTME: Owns validation, override storage and change detection for a single tweak
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

//! # Tweaks
//!
//! A [`Tweak<T>`] holds an immutable default and an optional override. Its
//! current value is the override when present, otherwise the default. The
//! override is only ever replaced by a value that passed validation.
//!
//! The registry stores tweaks of different value types side by side through
//! [`AnyTweak`], which exposes only metadata. The raw string mutations live
//! on a sealed supertrait so that only the registry can apply them, and every
//! change to a registered tweak is recorded. The concrete `T` stays with
//! whoever holds the `Arc<Tweak<T>>`.

use crate::constraints::{ConstraintInfo, Constraints};
use crate::errors::TweakError;
use crate::event::EventSource;
use crate::registry::{Registry, WeakRegistry};
use crate::value::TweakValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Unique, case-sensitive tweak identifier
pub type TweakKey = String;

/// Display values captured around a successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    /// Display value before the mutation
    pub old: String,
    /// Display value after the mutation
    pub new: String,
}

impl ValueChange {
    /// Whether the display value actually changed; only these produce events
    #[must_use]
    pub fn is_observable(&self) -> bool {
        self.old != self.new
    }
}

/// Listing record for one tweak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweakInfo {
    /// Tweak key
    pub key: TweakKey,
    /// Value type label
    #[serde(rename = "type")]
    pub type_name: String,
    /// Display form of the default value
    pub default: String,
    /// Display form of the current value
    pub current: String,
    /// Configured constraints, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ConstraintInfo>,
}

impl TweakInfo {
    /// Console description: `<key> = <current> (default: <default>) [<type>] {..}`
    #[must_use]
    pub fn describe(&self) -> String {
        let suffix = self
            .constraints
            .as_ref()
            .map(ConstraintInfo::suffix)
            .unwrap_or_default();
        format!(
            "{} = {} (default: {}) [{}]{}",
            self.key, self.current, self.default, self.type_name, suffix
        )
    }
}

pub(crate) mod sealed {
    use super::ValueChange;
    use crate::errors::TweakError;

    /// Unrecorded mutations, reachable only from inside this crate
    pub trait Mutate {
        /// Parse, validate and store an override.
        ///
        /// # Errors
        ///
        /// Returns [`TweakError::InvalidValue`] when the text does not parse,
        /// or the validation error when the parsed value violates the
        /// constraints. The tweak is left untouched on error.
        fn set_from_string(&self, input: &str) -> Result<ValueChange, TweakError>;

        /// Clear the override. Returns `None` when there was no override to clear.
        fn reset(&self) -> Option<ValueChange>;
    }
}

use sealed::Mutate;

/// Type-erased view of a tweak used by the registry and remote consoles
pub trait AnyTweak: Mutate + Send + Sync {
    /// Tweak key
    fn key(&self) -> &str;

    /// Value type label
    fn type_name(&self) -> &'static str;

    /// Display form of the default value
    fn default_value_string(&self) -> String;

    /// Display form of the current value
    fn current_value_string(&self) -> String;

    /// Display strings of the constraints, when the tweak has any
    fn constraint_info(&self) -> Option<ConstraintInfo>;

    /// Whether an override is active
    fn is_overridden(&self) -> bool;

    /// Listing record
    fn info(&self) -> TweakInfo {
        TweakInfo {
            key: self.key().to_owned(),
            type_name: self.type_name().to_owned(),
            default: self.default_value_string(),
            current: self.current_value_string(),
            constraints: self.constraint_info(),
        }
    }
}

/// A named, typed, runtime-overridable value
pub struct Tweak<T: TweakValue> {
    key: TweakKey,
    default_value: T,
    constraints: Option<Constraints<T>>,
    override_value: RwLock<Option<T>>,
    registry: Option<WeakRegistry>,
}

impl<T: TweakValue> Tweak<T> {
    /// Create an unregistered tweak with no constraints
    #[must_use]
    pub fn new(key: impl Into<TweakKey>, default_value: T) -> Self {
        Self {
            key: key.into(),
            default_value,
            constraints: None,
            override_value: RwLock::new(None),
            registry: None,
        }
    }

    /// Attach constraints
    #[must_use]
    pub fn with_constraints(mut self, constraints: Constraints<T>) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Register with `registry` and return the shared handle.
    ///
    /// Typed `set`/`reset` calls on the returned tweak record events in that
    /// registry, exactly like string commands do.
    pub fn register(mut self, registry: &Registry) -> Arc<Self> {
        self.registry = Some(registry.downgrade());
        let tweak = Arc::new(self);
        registry.register(Arc::clone(&tweak) as Arc<dyn AnyTweak>);
        tweak
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn default_value(&self) -> &T {
        &self.default_value
    }

    #[must_use]
    pub const fn constraints(&self) -> Option<&Constraints<T>> {
        self.constraints.as_ref()
    }

    /// Current value: the override when present, otherwise the default
    #[must_use]
    pub fn value(&self) -> T {
        self.read_override()
            .as_ref()
            .unwrap_or(&self.default_value)
            .clone()
    }

    /// Active override, if any
    #[must_use]
    pub fn override_value(&self) -> Option<T> {
        self.read_override().clone()
    }

    /// Validate `value` against this tweak's constraints.
    ///
    /// # Errors
    ///
    /// Returns the first failing range or step check.
    pub fn validate(&self, value: &T) -> Result<(), TweakError> {
        self.constraints
            .as_ref()
            .map_or(Ok(()), |constraints| value.validate(constraints))
    }

    /// Validate and store an override, recording an event in the owning
    /// registry when the display value changes.
    ///
    /// # Errors
    ///
    /// Returns the validation error; the tweak keeps its previous value.
    pub fn set(&self, value: T, source: EventSource) -> Result<(), TweakError> {
        match self.registry() {
            Some(registry) => registry
                .commit(self, source, || self.apply(value).map(Some))
                .map(drop),
            None => self.apply(value).map(drop),
        }
    }

    /// Parse `input` as `T`, then [`Tweak::set`] it.
    ///
    /// # Errors
    ///
    /// Returns [`TweakError::InvalidValue`] when the text does not parse, or
    /// the validation error from [`Tweak::set`].
    pub fn set_parsed(&self, input: &str, source: EventSource) -> Result<(), TweakError> {
        let value = T::parse(input).ok_or_else(|| TweakError::invalid_value(input))?;
        self.set(value, source)
    }

    /// Clear the override, recording an event in the owning registry when the
    /// display value changes. Returns whether an override was cleared.
    pub fn reset_with_source(&self, source: EventSource) -> bool {
        let mut cleared = false;
        let mut clear = || {
            let change = self.clear();
            cleared = change.is_some();
            Ok(change)
        };
        match self.registry() {
            Some(registry) => {
                if let Err(e) = registry.commit(self, source, clear) {
                    tracing::warn!(key = %self.key, error = %e, "Tweak reset failed");
                }
            }
            None => {
                let _ = clear();
            }
        }
        cleared
    }

    fn registry(&self) -> Option<Registry> {
        self.registry.as_ref().and_then(WeakRegistry::upgrade)
    }

    fn apply(&self, value: T) -> Result<ValueChange, TweakError> {
        self.validate(&value)?;
        let new = value.describe();
        let mut slot = self.write_override();
        let old = slot.as_ref().unwrap_or(&self.default_value).describe();
        *slot = Some(value);
        drop(slot);
        Ok(ValueChange { old, new })
    }

    fn clear(&self) -> Option<ValueChange> {
        let previous = self.write_override().take()?;
        Some(ValueChange {
            old: previous.describe(),
            new: self.default_value.describe(),
        })
    }

    fn read_override(&self) -> RwLockReadGuard<'_, Option<T>> {
        self.override_value.read().unwrap_or_else(|poisoned| {
            tracing::warn!(key = %self.key, "Tweak lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_override(&self) -> RwLockWriteGuard<'_, Option<T>> {
        self.override_value.write().unwrap_or_else(|poisoned| {
            tracing::warn!(key = %self.key, "Tweak lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl<T: TweakValue> AnyTweak for Tweak<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn default_value_string(&self) -> String {
        self.default_value.describe()
    }

    fn current_value_string(&self) -> String {
        self.read_override()
            .as_ref()
            .unwrap_or(&self.default_value)
            .describe()
    }

    fn constraint_info(&self) -> Option<ConstraintInfo> {
        self.constraints.as_ref().map(Constraints::info)
    }

    fn is_overridden(&self) -> bool {
        self.read_override().is_some()
    }
}

impl<T: TweakValue> Mutate for Tweak<T> {
    fn set_from_string(&self, input: &str) -> Result<ValueChange, TweakError> {
        let value = T::parse(input).ok_or_else(|| TweakError::invalid_value(input))?;
        self.apply(value)
    }

    fn reset(&self) -> Option<ValueChange> {
        self.clear()
    }
}

impl<T: TweakValue> fmt::Debug for Tweak<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tweak")
            .field("key", &self.key)
            .field("type", &T::TYPE_NAME)
            .field("default", &self.default_value.describe())
            .field("current", &self.current_value_string())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_from_string_reports_change() {
        let tweak = Tweak::new("x", 1_i64);
        let change = tweak.set_from_string("2").unwrap();
        assert_eq!(
            change,
            ValueChange {
                old: "1".into(),
                new: "2".into()
            }
        );
        assert_eq!(tweak.value(), 2);
    }

    #[test]
    fn test_failed_set_leaves_state_untouched() {
        let tweak = Tweak::new("x", 5_i64).with_constraints(Constraints::new().range(0, 10));
        assert!(tweak.set_from_string("11").is_err());
        assert!(tweak.set_from_string("eleven").is_err());
        assert!(!tweak.is_overridden());
        assert_eq!(tweak.value(), 5);
    }

    #[test]
    fn test_reset_without_override_is_not_a_change() {
        let tweak = Tweak::new("flag", false);
        assert!(Mutate::reset(&tweak).is_none());

        tweak.set_from_string("false").unwrap();
        let change = Mutate::reset(&tweak).unwrap();
        assert!(!change.is_observable());
    }

    #[test]
    fn test_describe_includes_constraints() {
        let tweak = Tweak::new("speed", 1.0_f64)
            .with_constraints(Constraints::new().range(0.0, 10.0).step(0.5));
        assert_eq!(
            tweak.info().describe(),
            "speed = 1.0 (default: 1.0) [f64] {min=0.0, max=10.0, step=0.5}"
        );
    }

    #[test]
    fn test_unregistered_typed_set_still_validates() {
        let tweak = Tweak::new("count", 4_u32).with_constraints(Constraints::new().step(2));
        assert!(tweak.set(6, EventSource::Code).is_ok());
        assert_eq!(tweak.value(), 6);
        assert!(matches!(
            tweak.set(7, EventSource::Code),
            Err(TweakError::StepMismatch { .. })
        ));
        assert!(tweak.reset_with_source(EventSource::Code));
        assert_eq!(tweak.value(), 4);
    }

    #[test]
    fn test_set_parsed_uses_value_parser() {
        let tweak = Tweak::new("lives", 3_i32).with_constraints(Constraints::new().max(9));
        tweak.set_parsed(" 7 ", EventSource::Ui).unwrap();
        assert_eq!(tweak.value(), 7);
        assert_eq!(
            tweak.set_parsed("seven", EventSource::Ui),
            Err(TweakError::InvalidValue("seven".into()))
        );
        assert!(matches!(
            tweak.set_parsed("10", EventSource::Ui),
            Err(TweakError::OutOfRange { .. })
        ));
        assert_eq!(tweak.value(), 7);
    }
}
