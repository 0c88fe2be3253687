// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dropdown errors.

use cascade_core::error::PoolError;
use thiserror::Error;

/// Errors that can occur when constructing, configuring or opening a [Dropdown](super::Dropdown).
#[derive(Error, Debug)]
pub enum DropdownError {
    /// A required element is not part of the host tree.
    #[error("Required element '{0}' is not part of the host tree")]
    MissingElement(&'static str),

    /// Checking an element in or out of a pool failed.
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// The configuration text could not be parsed.
    #[error("Invalid dropdown configuration: {0}")]
    Config(#[from] toml::de::Error),
}
