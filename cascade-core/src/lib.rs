#![warn(missing_docs)]

//! Core library for cascade => See `cascade` crate.
//!
//! Contains the host contract, object pools, task scheduling and focus utilities.

/// Contains the [Host](host::Host) trait and the element and event types it speaks.
pub mod host;

/// Contains the [Update](update::Update) flags.
pub mod update;

/// Contains the [ObjectPool](pool::ObjectPool).
pub mod pool;

/// Contains the [Scheduler](scheduler::Scheduler) for delayed and next-layout tasks.
pub mod scheduler;

/// Contains tree order and focus traversal helpers.
pub mod focus;

/// Contains the [PoolError](error::PoolError).
pub mod error;

/// Contains the in-memory [HeadlessHost](headless::HeadlessHost).
#[cfg(any(test, feature = "headless"))]
pub mod headless;

pub use error::PoolError;
pub use host::{ElementId, Host, NavigationDirection, PickingMode, UiEvent};
pub use update::Update;
