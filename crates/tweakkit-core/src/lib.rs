// ABOUTME: Core tweak registry for TweakKit live configuration
// ABOUTME: Typed values, constraints, tweaks, change events, bounded history and the registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

#![deny(unsafe_code)]

//! # TweakKit Core
//!
//! Runtime-adjustable, typed configuration values. Application code declares a
//! [`Tweak`] with a default and optional [`Constraints`], registers it with a
//! [`Registry`], and reads its current value wherever it is needed. Consoles
//! and other tools change tweaks through the registry by key and string value;
//! every observable change is recorded as a [`TweakEvent`].
//!
//! ## Modules
//!
//! - **value**: the [`TweakValue`] and [`Numeric`] capabilities and their implementations
//! - **constraints**: min/max/step checks
//! - **tweak**: the typed [`Tweak`] and its type-erased [`AnyTweak`] view
//! - **event**: change records and their console line format
//! - **history**: the bounded event log
//! - **registry**: the shared owner of tweaks, history and observers
//! - **errors**: [`TweakError`]
//!
//! ```
//! use tweakkit_core::{Constraints, EventSource, Registry, Tweak};
//!
//! let registry = Registry::new();
//! let speed = Tweak::new("physics.speed", 1.0_f64)
//!     .with_constraints(Constraints::new().range(0.0, 10.0))
//!     .register(&registry);
//!
//! registry.set("physics.speed", "2.5", EventSource::Web).ok();
//! assert!((speed.value() - 2.5).abs() < f64::EPSILON);
//! ```

/// Validation errors
pub mod errors;

/// Typed value capabilities
pub mod value;

/// Range and step constraints
pub mod constraints;

/// Change events
pub mod event;

/// Bounded change history
pub mod history;

/// Typed tweaks and their type-erased interface
pub mod tweak;

/// Shared tweak registry
pub mod registry;

pub use constraints::{ConstraintInfo, Constraints, REAL_TOLERANCE};
pub use errors::TweakError;
pub use event::{EventSource, TweakEvent};
pub use history::{History, HISTORY_CAPACITY};
pub use registry::{ObserverHandler, ObserverId, Registry};
pub use tweak::{AnyTweak, Tweak, TweakInfo, TweakKey, ValueChange};
pub use value::{Numeric, TweakValue};
