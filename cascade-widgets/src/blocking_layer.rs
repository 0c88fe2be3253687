// SPDX-License-Identifier: MIT OR Apache-2.0

//! A full-bleed element that sits between an overlay and the rest of the UI.
//!
//! The layer catches clicks outside the overlay and navigation cancels, and
//! keeps keyboard focus from escaping to elements below it. It never removes
//! itself: [BlockingLayer::handle_event] reports what should happen and the
//! owner decides how to close.

use bitflags::bitflags;
use cascade_core::focus::is_above;
use cascade_core::host::{ElementId, Host, PickingMode, UiEvent};
use cascade_core::update::Update;

use crate::dropdown::classnames::DROPDOWN;

bitflags! {
    /// How a [BlockingLayer] reacts to interaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BlockingBehavior: u8 {
        /// Pointer events reach the elements under the layer.
        const PICK_THROUGH = 0b001;
        /// A pointer press outside the overlay closes it.
        const CLOSE_ON_CLICK = 0b010;
        /// A navigation cancel closes the overlay.
        const CLOSE_ON_CANCEL = 0b100;
        /// Close on click and on cancel.
        const CLOSEABLE = Self::CLOSE_ON_CLICK.bits() | Self::CLOSE_ON_CANCEL.bits();
        /// Everything.
        const ALL = Self::PICK_THROUGH.bits() | Self::CLOSEABLE.bits();
    }
}

impl Default for BlockingBehavior {
    fn default() -> Self {
        Self::CLOSEABLE
    }
}

/// What the owner of a [BlockingLayer] should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerResponse {
    /// Close the overlay and detach the layer.
    pub close: bool,
    /// Resend the event to this element under the layer, after closing.
    pub redispatch: Option<ElementId>,
    /// What the layer changed itself.
    pub update: Update,
}

impl LayerResponse {
    fn close() -> Self {
        Self {
            close: true,
            ..Default::default()
        }
    }

    fn update(update: Update) -> Self {
        Self {
            update,
            ..Default::default()
        }
    }
}

/// An input-blocking layer stretched over its container.
#[derive(Debug)]
pub struct BlockingLayer {
    element: ElementId,
    behavior: BlockingBehavior,
}

impl BlockingLayer {
    /// Create a detached layer.
    pub fn new<H: Host + ?Sized>(host: &mut H, behavior: BlockingBehavior) -> Self {
        let element = host.create_element();
        host.set_focusable(element, true);
        host.set_stretch_to_parent(element);
        host.add_class(element, DROPDOWN);

        let mut layer = Self {
            element,
            behavior: BlockingBehavior::empty(),
        };
        layer.set_behavior(host, behavior);
        layer
    }

    /// The layer element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The current behavior.
    pub fn behavior(&self) -> BlockingBehavior {
        self.behavior
    }

    /// Change the behavior. Pick-through layers are transparent to picking.
    pub fn set_behavior<H: Host + ?Sized>(&mut self, host: &mut H, behavior: BlockingBehavior) {
        self.behavior = behavior;
        let picking = if behavior.contains(BlockingBehavior::PICK_THROUGH) {
            PickingMode::Ignore
        } else {
            PickingMode::Position
        };
        host.set_picking(self.element, picking);
    }

    /// Check whether the layer is attached to `container`.
    pub fn is_attached_to<H: Host + ?Sized>(&self, host: &H, container: ElementId) -> bool {
        host.parent(self.element) == Some(container)
    }

    /// Attach the layer on top of everything else in `container`.
    pub fn attach<H: Host + ?Sized>(&self, host: &mut H, container: ElementId) {
        host.add_child(container, self.element);
    }

    /// Detach the layer, dropping focus if something inside it had it.
    pub fn detach<H: Host + ?Sized>(&self, host: &mut H) {
        if let Some(focused) = host.focused() {
            if host.is_within(focused, self.element) {
                host.blur(focused);
            }
        }
        host.remove_from_parent(self.element);
    }

    /// React to an event the host routed while the layer is attached.
    ///
    /// `target` is the element the event was sent to, which may be anywhere in
    /// the host tree: focus containment and pick-through closing look at every
    /// event, not only those sent to the layer.
    pub fn handle_event<H: Host + ?Sized>(
        &self,
        host: &mut H,
        target: ElementId,
        event: UiEvent,
    ) -> LayerResponse {
        match event {
            UiEvent::PointerDown { position } => {
                if self.behavior.contains(BlockingBehavior::PICK_THROUGH) {
                    if !self.behavior.contains(BlockingBehavior::CLOSE_ON_CLICK) {
                        return LayerResponse::default();
                    }

                    let outside = match host.pick(position) {
                        Some(picked) => !is_above(host, picked, self.element),
                        None => true,
                    };
                    if outside {
                        log::trace!("Pointer down outside of the blocking layer at {position:?}");
                        return LayerResponse::close();
                    }
                    LayerResponse::default()
                } else if target == self.element {
                    host.set_picking(self.element, PickingMode::Ignore);
                    let picked = host.pick(position);
                    host.set_picking(self.element, PickingMode::Position);

                    LayerResponse {
                        close: self.behavior.contains(BlockingBehavior::CLOSE_ON_CLICK),
                        redispatch: picked,
                        update: Update::empty(),
                    }
                } else {
                    LayerResponse::default()
                }
            },

            UiEvent::NavigationCancel
                if self.behavior.contains(BlockingBehavior::CLOSE_ON_CANCEL)
                    && host.is_within(target, self.element) =>
            {
                LayerResponse::close()
            },

            // the pointer left every panel, take focus away from the rows
            UiEvent::PointerOver if target == self.element => {
                host.focus(self.element);
                LayerResponse::update(Update::FOCUS)
            },

            UiEvent::FocusIn if target != self.element && !is_above(host, target, self.element) => {
                log::trace!("Focus escaped below the blocking layer to {target:?}");
                host.focus(self.element);
                LayerResponse::update(Update::FOCUS)
            },

            _ => LayerResponse::default(),
        }
    }
}
