// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object pool errors.

use thiserror::Error;

/// Errors that can occur when checking instances in and out of an [ObjectPool](crate::pool::ObjectPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No instance is available and the pool does not auto-expand.
    #[error("No more pool objects available (pool size {size})")]
    Exhausted {
        /// Number of instances the pool owns.
        size: usize,
    },

    /// The returned instance was not checked out of this pool.
    #[error("Object cannot be returned because it has not been extracted from the pool")]
    InvalidReturn,
}
