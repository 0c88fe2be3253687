#![warn(missing_docs)]

//! Pooled, nested dropdown and context menus for retained-mode UI trees.
//!
//! The menus live in a host's element tree: implement [core::host::Host] for
//! your framework, create a [widgets::dropdown::Dropdown] on a container and
//! route events, ticks and layout notifications to it.

pub use kurbo as geometry;
pub use nalgebra as math;

pub use cascade_core as core;
pub use cascade_widgets as widgets;

/// A "prelude" for users of cascade.
///
/// Importing this module brings into scope the most common types
/// needed to open a menu.
///
/// ```rust
/// use cascade::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::host::{ElementId, Host, NavigationDirection, PickingMode, UiEvent};
    pub use crate::core::update::Update;

    pub use crate::widgets::blocking_layer::BlockingBehavior;
    pub use crate::widgets::dropdown::{
        ActionStatus, Anchor, Dropdown, DropdownConfig, DropdownError, DropdownMenu, DropdownOptions, MenuAction,
        MenuItem, MenuSeparator, TriggerEvent,
    };

    // Geometry
    pub use kurbo::{Point, Rect};
}
