#![warn(missing_docs)]

//! Widget library for cascade => See `cascade` crate.
//!
//! Contains the dropdown menu and the blocking layer it opens on.

/// Contains the [blocking_layer::BlockingLayer] widget.
pub mod blocking_layer;

/// Contains the [dropdown::Dropdown] widget and its menu model.
pub mod dropdown;
