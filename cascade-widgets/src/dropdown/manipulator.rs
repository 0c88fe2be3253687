// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-row behavior: hover activation, execution and keyboard navigation.

use cascade_core::focus::{
    find_first_focusable_child, find_next_focusable_sibling, find_previous_focusable_sibling,
};
use cascade_core::host::{ElementId, Host, NavigationDirection, UiEvent};
use cascade_core::scheduler::TaskHandle;
use cascade_core::update::Update;

use super::classnames::*;
use super::menu::{ActionItemKey, MenuStore, PanelKey, SubItemKey};
use super::model::{ActionCallback, ActionStatus};
use super::DeferredTask;

/// Reference to a checked out row in one of the two row pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ItemRef {
    Action(ActionItemKey),
    SubMenu(SubItemKey),
}

/// What a row does when executed.
pub(crate) enum ItemRole {
    Action { execute: Option<ActionCallback> },
    SubMenu { sub_menu: Option<PanelKey> },
}

/// What the dropdown has to do after a row handled an event.
pub(crate) enum ItemResponse {
    Handled(Update),
    /// Close the dropdown, then run the callback.
    Execute(Option<ActionCallback>),
}

/// State of a pooled row element.
pub(crate) struct ItemManipulator {
    pub element: ElementId,
    pub panel: Option<PanelKey>,
    pub role: ItemRole,
    /// Pending delayed activation
    pub pending: Option<TaskHandle>,
    enabled: bool,
    hidden: bool,
}

impl ItemManipulator {
    pub fn action(element: ElementId) -> Self {
        Self::with_role(element, ItemRole::Action { execute: None })
    }

    pub fn sub_menu(element: ElementId) -> Self {
        Self::with_role(element, ItemRole::SubMenu { sub_menu: None })
    }

    fn with_role(element: ElementId, role: ItemRole) -> Self {
        Self {
            element,
            panel: None,
            role,
            pending: None,
            enabled: false,
            hidden: false,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn sub_menu_panel(&self) -> Option<PanelKey> {
        match self.role {
            ItemRole::SubMenu { sub_menu } => sub_menu,
            ItemRole::Action { .. } => None,
        }
    }

    pub fn set_enabled<H: Host + ?Sized>(&mut self, host: &mut H, enabled: bool) {
        self.enabled = enabled;
        host.set_class_enabled(self.element, ITEM_DISABLED, !enabled);
    }

    /// Hidden rows can't take focus, which also takes them out of keyboard traversal.
    pub fn set_hidden<H: Host + ?Sized>(&mut self, host: &mut H, hidden: bool) {
        self.hidden = hidden;
        host.set_class_enabled(self.element, ITEM_HIDDEN, hidden);
        host.set_focusable(self.element, !hidden);
    }

    pub fn assign_action<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        panel: PanelKey,
        execute: Option<ActionCallback>,
        status: ActionStatus,
    ) {
        self.panel = Some(panel);
        self.role = ItemRole::Action { execute };
        self.set_enabled(host, status.is_enabled());
        self.set_hidden(host, status.is_hidden());
    }

    pub fn assign_sub_menu<H: Host + ?Sized>(&mut self, host: &mut H, panel: PanelKey, sub_menu: PanelKey) {
        self.panel = Some(panel);
        self.role = ItemRole::SubMenu {
            sub_menu: Some(sub_menu),
        };
        self.set_enabled(host, true);
        self.set_hidden(host, false);
    }

    /// Clear all transient state and every status class.
    pub fn reset<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.panel = None;
        self.pending = None;
        self.role = match self.role {
            ItemRole::Action { .. } => ItemRole::Action { execute: None },
            ItemRole::SubMenu { .. } => ItemRole::SubMenu { sub_menu: None },
        };
        self.enabled = false;
        self.hidden = false;

        for class in [ITEM_HIDDEN, ITEM_CHECKED, ITEM_DISABLED, ITEM_HOVERED, SUB_ITEM_OPENED] {
            host.remove_class(self.element, class);
        }
        host.set_focusable(self.element, true);
    }
}

/// Sync the status classes of a row with an action status.
pub(crate) fn apply_status_classes<H: Host + ?Sized>(host: &mut H, element: ElementId, status: ActionStatus) {
    host.set_class_enabled(element, ITEM_HIDDEN, status.is_hidden());
    host.set_class_enabled(element, ITEM_CHECKED, status.contains(ActionStatus::CHECKED));
    host.set_class_enabled(element, ITEM_DISABLED, status.contains(ActionStatus::DISABLED));
}

impl<H: Host + 'static> MenuStore<H> {
    pub(crate) fn item(&self, item: ItemRef) -> Option<&ItemManipulator> {
        match item {
            ItemRef::Action(key) => self.action_items.get(key),
            ItemRef::SubMenu(key) => self.sub_items.get(key),
        }
    }

    pub(crate) fn item_mut(&mut self, item: ItemRef) -> Option<&mut ItemManipulator> {
        match item {
            ItemRef::Action(key) => self.action_items.get_mut(key),
            ItemRef::SubMenu(key) => self.sub_items.get_mut(key),
        }
    }

    /// Check whether the row is part of the current tree rather than sitting in its pool.
    pub(crate) fn is_checked_out(&self, item: ItemRef) -> bool {
        match item {
            ItemRef::Action(key) => self.action_items.is_in_use(key),
            ItemRef::SubMenu(key) => self.sub_items.is_in_use(key),
        }
    }

    pub(crate) fn handle_item_event(&mut self, host: &mut H, item: ItemRef, event: UiEvent) -> ItemResponse {
        match event {
            UiEvent::PointerEnter => ItemResponse::Handled(self.hover(host, item, true)),
            UiEvent::FocusIn => ItemResponse::Handled(self.hover(host, item, false)),
            UiEvent::PointerLeave => ItemResponse::Handled(self.unhover(host, item, true)),
            UiEvent::FocusOut => ItemResponse::Handled(self.unhover(host, item, false)),
            UiEvent::PointerUp => {
                if let Some(row) = self.item(item) {
                    host.blur(row.element);
                }
                self.submit(host, item)
            },
            UiEvent::NavigationSubmit => self.submit(host, item),
            UiEvent::NavigationMove(direction) => ItemResponse::Handled(self.navigate(host, item, direction)),
            UiEvent::NavigationCancel | UiEvent::PointerDown { .. } | UiEvent::PointerOver => {
                ItemResponse::Handled(Update::empty())
            },
        }
    }

    /// Start (or keep) the delayed activation and highlight the row.
    ///
    /// A pointer entering restarts the timer; a focus change only starts it if none is pending.
    fn hover(&mut self, host: &mut H, item: ItemRef, pointer: bool) -> Update {
        let generation = self.generation;
        let delay = self.sub_menu_open_delay;
        let Some(row) = self.item(item) else {
            return Update::empty();
        };
        let (element, panel) = (row.element, row.panel);
        let executable = row.enabled && !row.hidden;
        let pending = row.pending.filter(|&handle| self.tasks.is_pending(handle));

        let restart = match pending {
            Some(handle) if pointer => {
                self.tasks.cancel(handle);
                true
            },
            Some(_) => false,
            None => true,
        };
        if restart {
            let handle = executable
                .then(|| self.tasks.schedule_after(delay, DeferredTask::Activate { item, generation }));
            if let Some(row) = self.item_mut(item) {
                row.pending = handle;
            }
        }

        let open_target = panel
            .and_then(|panel| self.panels.get(panel))
            .and_then(|panel| panel.open_sub_menu)
            .and_then(|open| self.panels.get(open))
            .and_then(|open| open.target);
        if let Some(open_target) = open_target {
            if open_target != element {
                host.remove_class(open_target, SUB_ITEM_OPENED);
            }
        }

        host.add_class(element, ITEM_HOVERED);
        let mut update = Update::DRAW;
        if pointer && host.focused() != Some(element) {
            host.focus(element);
            update |= Update::FOCUS;
        }
        update
    }

    fn unhover(&mut self, host: &mut H, item: ItemRef, pointer: bool) -> Update {
        let Some(row) = self.item_mut(item) else {
            return Update::empty();
        };
        let (element, pending) = (row.element, row.pending.take());
        if let Some(handle) = pending {
            self.tasks.cancel(handle);
        }
        host.remove_class(element, ITEM_HOVERED);

        if pointer {
            host.blur(element);
            Update::DRAW | Update::FOCUS
        } else {
            Update::DRAW
        }
    }

    /// Run a delayed activation: sub-menu rows open, action rows close their siblings' sub-menus.
    pub(crate) fn activate(&mut self, host: &mut H, item: ItemRef) -> Update {
        let Some(row) = self.item_mut(item) else {
            return Update::empty();
        };
        row.pending = None;
        let panel = row.panel;

        match item {
            ItemRef::Action(_) => match panel {
                Some(panel) if self.close_sub_menus(host, panel) => Update::LAYOUT | Update::DRAW,
                _ => Update::empty(),
            },
            ItemRef::SubMenu(_) => match self.execute_if_enabled(host, item) {
                ItemResponse::Handled(update) => update,
                ItemResponse::Execute(_) => Update::empty(),
            },
        }
    }

    fn execute_if_enabled(&mut self, host: &mut H, item: ItemRef) -> ItemResponse {
        let Some(row) = self.item(item) else {
            return ItemResponse::Handled(Update::empty());
        };
        if !row.enabled || row.hidden {
            log::trace!("Ignoring execution of disabled row {:?}", row.element);
            return ItemResponse::Handled(Update::empty());
        }

        if let ItemRole::Action { execute } = &row.role {
            return ItemResponse::Execute(execute.clone());
        }
        ItemResponse::Handled(self.expand(host, item))
    }

    /// Open the sub-menu of a sub-menu row.
    fn expand(&mut self, host: &mut H, item: ItemRef) -> Update {
        let Some(row) = self.item(item) else {
            return Update::empty();
        };
        let (element, panel) = (row.element, row.panel);
        let Some(sub_menu) = row.sub_menu_panel() else {
            return Update::empty();
        };

        host.add_class(element, SUB_ITEM_OPENED);
        match panel {
            Some(panel) => self.open_sub_menu(host, panel, sub_menu) | Update::DRAW,
            None => Update::DRAW,
        }
    }

    fn focus_sub_menu(&mut self, host: &mut H, item: ItemRef) -> Update {
        let container = self
            .item(item)
            .and_then(ItemManipulator::sub_menu_panel)
            .and_then(|panel| self.panels.get(panel))
            .map(|panel| panel.container);

        match container.and_then(|container| find_first_focusable_child(host, container)) {
            Some(first) => {
                host.focus(first);
                Update::FOCUS
            },
            None => Update::empty(),
        }
    }

    fn submit(&mut self, host: &mut H, item: ItemRef) -> ItemResponse {
        let enabled = self.item(item).is_some_and(|row| row.enabled && !row.hidden);
        let response = self.execute_if_enabled(host, item);

        match (response, item) {
            (ItemResponse::Handled(update), ItemRef::SubMenu(_)) if enabled => {
                ItemResponse::Handled(update | self.focus_sub_menu(host, item))
            },
            (response, _) => response,
        }
    }

    fn navigate(&mut self, host: &mut H, item: ItemRef, direction: NavigationDirection) -> Update {
        let Some(row) = self.item(item) else {
            return Update::empty();
        };
        let (element, panel, enabled) = (row.element, row.panel, row.enabled);
        let mut update = Update::empty();

        match direction {
            NavigationDirection::Left => {
                let parent = panel
                    .and_then(|panel| self.panels.get(panel))
                    .and_then(|panel| Some((panel.parent?, panel.target?)));
                if let Some((parent, target)) = parent {
                    self.close_sub_menus(host, parent);
                    host.focus(target);
                    update |= Update::LAYOUT | Update::DRAW | Update::FOCUS;
                }
            },
            NavigationDirection::Up | NavigationDirection::Previous => {
                let previous = find_previous_focusable_sibling(host, element);
                if previous != element {
                    host.focus(previous);
                    update |= Update::FOCUS;
                }
            },
            NavigationDirection::Down | NavigationDirection::Next => {
                let next = find_next_focusable_sibling(host, element);
                if next != element {
                    host.focus(next);
                    update |= Update::FOCUS;
                }
            },
            NavigationDirection::Right => {},
        }

        if !enabled || !matches!(item, ItemRef::SubMenu(_)) {
            return update;
        }

        match direction {
            NavigationDirection::Right => {
                update |= self.expand(host, item);
                update |= self.focus_sub_menu(host, item);
            },
            NavigationDirection::Left => {},
            _ => {
                if let Some(panel) = panel {
                    if self.close_sub_menus(host, panel) {
                        update |= Update::LAYOUT | Update::DRAW;
                    }
                }
            },
        }
        update
    }
}
