// SPDX-License-Identifier: MIT OR Apache-2.0

//! The contract a retained-mode UI framework fulfils so menus can live in it.
//!
//! The menu core never owns layout, styling or event dispatch. It builds and
//! mutates elements through [Host], reads back resolved geometry once the
//! host's layout pass ran, and receives input as [UiEvent]s routed to it by
//! the host.

use kurbo::{Insets, Point, Rect};

/// Identifier of an element living in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Whether pointer picking considers an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickingMode {
    /// The element can be the target of pointer events.
    #[default]
    Position,
    /// The element is transparent to pointer picking.
    Ignore,
}

/// Direction of a keyboard navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    /// Arrow left.
    Left,
    /// Arrow up.
    Up,
    /// Arrow right.
    Right,
    /// Arrow down.
    Down,
    /// Shift+Tab or similar.
    Previous,
    /// Tab or similar.
    Next,
}

/// Input events the host routes to menu elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// The pointer entered the element.
    PointerEnter,
    /// The pointer left the element.
    PointerLeave,
    /// The pointer moved over the element (bubbles, unlike enter).
    PointerOver,
    /// A pointer button was pressed at the given world position.
    PointerDown {
        /// World position of the press.
        position: Point,
    },
    /// A pointer button was released.
    PointerUp,
    /// Keyboard submit (Enter/Space).
    NavigationSubmit,
    /// Keyboard cancel (Escape).
    NavigationCancel,
    /// Keyboard move intent.
    NavigationMove(NavigationDirection),
    /// The element received keyboard focus.
    FocusIn,
    /// The element lost keyboard focus.
    FocusOut,
}

/// Operations the menu core needs from the host UI framework.
///
/// All methods are infallible: an unknown [ElementId] is treated as a
/// detached, empty element.
pub trait Host {
    /// Create a new detached element.
    fn create_element(&mut self) -> ElementId;

    /// Check whether the element exists.
    fn contains(&self, id: ElementId) -> bool;

    /// Get the parent of an element.
    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Get the children of an element in visual order.
    fn children(&self, id: ElementId) -> &[ElementId];

    /// Append `child` to `parent`, detaching it from its previous parent first.
    fn add_child(&mut self, parent: ElementId, child: ElementId);

    /// Insert `child` into `parent` at `index` (clamped to the child count).
    fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId);

    /// Detach an element from its parent. No-op if detached.
    fn remove_from_parent(&mut self, id: ElementId);

    /// Detach every child of an element.
    fn clear_children(&mut self, id: ElementId);

    /// Add a style class.
    fn add_class(&mut self, id: ElementId, class: &str);

    /// Remove a style class.
    fn remove_class(&mut self, id: ElementId, class: &str);

    /// Check for a style class.
    fn has_class(&self, id: ElementId, class: &str) -> bool;

    /// Remove every style class.
    fn clear_classes(&mut self, id: ElementId);

    /// Name an element so it can be found with [Host::find_named].
    fn set_name(&mut self, id: ElementId, name: &str);

    /// Get the name of an element.
    fn name(&self, id: ElementId) -> Option<&str>;

    /// Set the text content of an element.
    fn set_text(&mut self, id: ElementId, text: &str);

    /// Set whether the element can receive keyboard focus.
    fn set_focusable(&mut self, id: ElementId, focusable: bool);

    /// Check whether the element can receive keyboard focus.
    fn is_focusable(&self, id: ElementId) -> bool;

    /// Set the picking mode.
    fn set_picking(&mut self, id: ElementId, mode: PickingMode);

    /// Get the picking mode.
    fn picking(&self, id: ElementId) -> PickingMode;

    /// Make the element fill its parent.
    fn set_stretch_to_parent(&mut self, id: ElementId);

    /// Set the absolute position relative to the parent, or clear it.
    fn set_position(&mut self, id: ElementId, position: Option<Point>);

    /// Get the resolved bounding box in world coordinates.
    fn world_bound(&self, id: ElementId) -> Rect;

    /// Get the resolved bounding box relative to the parent.
    fn local_bound(&self, id: ElementId) -> Rect;

    /// Get the resolved margins.
    fn margins(&self, id: ElementId) -> Insets;

    /// Convert a world point into the element's local space.
    fn world_to_local(&self, id: ElementId, point: Point) -> Point;

    /// Find the top-most pickable element under a world point.
    fn pick(&self, point: Point) -> Option<ElementId>;

    /// Give keyboard focus to an element.
    fn focus(&mut self, id: ElementId);

    /// Take keyboard focus away from an element, if it has it.
    fn blur(&mut self, id: ElementId);

    /// Get the focused element.
    fn focused(&self) -> Option<ElementId>;

    /// Send an event to `target` through the host's normal dispatch.
    fn redispatch(&mut self, target: ElementId, event: UiEvent);

    /// Add or remove a style class.
    fn set_class_enabled(&mut self, id: ElementId, class: &str, enabled: bool) {
        if enabled {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Find the first descendant (depth first) with the given name.
    fn find_named(&self, root: ElementId, name: &str) -> Option<ElementId> {
        for &child in self.children(root) {
            if self.name(child) == Some(name) {
                return Some(child);
            }
            if let Some(found) = self.find_named(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Check whether `id` is `ancestor` or one of its descendants.
    fn is_within(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(element) = current {
            if element == ancestor {
                return true;
            }
            current = self.parent(element);
        }
        false
    }

    /// Get the index of `id` among its siblings.
    fn index_in_parent(&self, id: ElementId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }
}
