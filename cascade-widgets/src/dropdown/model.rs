// SPDX-License-Identifier: MIT OR Apache-2.0

//! The abstract menu a caller hands to [Dropdown::open](super::Dropdown::open).
//!
//! Items are a flat list. Nesting is encoded in slash-delimited paths: an
//! action named `"File/Export/PNG"` lives in the `Export` sub-menu of the
//! `File` sub-menu and is labelled `PNG`.

use bitflags::bitflags;
use cascade_core::host::ElementId;
use cascade_core::update::Update;
use kurbo::Point;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

bitflags! {
    /// Display status of a [MenuAction].
    ///
    /// The empty set means the action has no status at all and is hidden.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ActionStatus: u8 {
        /// Shown and executable.
        const NORMAL = 0b0001;
        /// Shown but can't be executed.
        const DISABLED = 0b0010;
        /// Shown with a check mark.
        const CHECKED = 0b0100;
        /// Not shown.
        const HIDDEN = 0b1000;
    }
}

impl Default for ActionStatus {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl ActionStatus {
    /// Check whether a row with this status is executable.
    pub fn is_enabled(self) -> bool {
        !self.contains(Self::DISABLED)
    }

    /// Check whether a row with this status is not displayed.
    pub fn is_hidden(self) -> bool {
        self.is_empty() || self.contains(Self::HIDDEN)
    }
}

/// Callback run when an action is executed.
pub type ActionCallback = Arc<dyn Fn() -> Update + Send + Sync>;

/// Callback computing the status of an action right before the menu opens.
pub type StatusCallback = Arc<dyn Fn(&MenuAction) -> ActionStatus + Send + Sync>;

/// The event that caused a menu to open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEvent {
    /// World position of the pointer (or of the anchor when opened programmatically).
    pub position: Point,
    /// The element that received the event, if any.
    pub target: Option<ElementId>,
}

impl TriggerEvent {
    /// A trigger at a world position without a target element.
    pub fn at(position: Point) -> Self {
        Self {
            position,
            target: None,
        }
    }

    /// Set the target element.
    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }
}

/// An executable menu entry.
#[derive(Clone)]
pub struct MenuAction {
    name: String,
    status: ActionStatus,
    execute: Option<ActionCallback>,
    status_callback: Option<StatusCallback>,
    user_data: Option<Arc<dyn Any + Send + Sync>>,
    trigger: Option<TriggerEvent>,
}

impl MenuAction {
    /// Create an action without callback. `name` is the slash-delimited path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ActionStatus::NORMAL,
            execute: None,
            status_callback: None,
            user_data: None,
            trigger: None,
        }
    }

    /// Set the callback run when the action is executed.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn() -> Update + Send + Sync + 'static,
    {
        self.execute = Some(Arc::new(action));
        self
    }

    /// Set a fixed status.
    pub fn with_status(mut self, status: ActionStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the callback recomputing the status whenever the menu is prepared for display.
    pub fn with_status_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&MenuAction) -> ActionStatus + Send + Sync + 'static,
    {
        self.status_callback = Some(Arc::new(callback));
        self
    }

    /// Attach arbitrary data, e.g. for a custom `set_item` callback.
    pub fn with_user_data<T: Any + Send + Sync>(mut self, data: T) -> Self {
        self.user_data = Some(Arc::new(data));
        self
    }

    /// Status callback for actions that are always enabled.
    pub fn always_enabled(_: &MenuAction) -> ActionStatus {
        ActionStatus::NORMAL
    }

    /// Status callback for actions that are always disabled.
    pub fn always_disabled(_: &MenuAction) -> ActionStatus {
        ActionStatus::DISABLED
    }

    /// The full slash-delimited name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name split into path segments.
    pub fn path(&self) -> Vec<&str> {
        self.name.split('/').collect()
    }

    /// The current status.
    pub fn status(&self) -> ActionStatus {
        self.status
    }

    /// Override the current status.
    pub fn set_status(&mut self, status: ActionStatus) {
        self.status = status;
    }

    /// The callback run on execution.
    pub fn callback(&self) -> Option<&ActionCallback> {
        self.execute.as_ref()
    }

    /// Run the action callback.
    pub fn execute(&self) -> Update {
        self.execute.as_ref().map(|action| action()).unwrap_or_default()
    }

    /// The attached user data, if it has type `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref().and_then(|data| data.downcast_ref())
    }

    /// The event that opened the menu this action was last prepared for.
    pub fn trigger(&self) -> Option<&TriggerEvent> {
        self.trigger.as_ref()
    }

    fn update_status(&mut self, trigger: &TriggerEvent) {
        self.trigger = Some(*trigger);
        if let Some(callback) = self.status_callback.clone() {
            self.status = callback(self);
        }
    }
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuAction")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("has_action", &self.execute.is_some())
            .finish_non_exhaustive()
    }
}

/// A separator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSeparator {
    /// Path of the sub-menu the separator goes into, e.g. `"Edit/"`. Empty for the root.
    pub sub_menu_path: String,
}

impl MenuSeparator {
    /// Create a separator in the given sub-menu.
    pub fn new(sub_menu_path: impl Into<String>) -> Self {
        Self {
            sub_menu_path: sub_menu_path.into(),
        }
    }

    /// The sub-menu path split into segments, ending with the (empty) label.
    pub fn path(&self) -> Vec<&str> {
        self.sub_menu_path.split('/').collect()
    }
}

/// An entry of a [DropdownMenu].
#[derive(Debug, Clone)]
pub enum MenuItem {
    /// An executable entry.
    Action(MenuAction),
    /// A separator line.
    Separator(MenuSeparator),
}

impl MenuItem {
    /// The path of the item, one segment per nesting level plus the label.
    pub fn path(&self) -> Vec<&str> {
        match self {
            MenuItem::Action(action) => action.path(),
            MenuItem::Separator(separator) => separator.path(),
        }
    }

    /// Get the action, if this is one.
    pub fn as_action(&self) -> Option<&MenuAction> {
        match self {
            MenuItem::Action(action) => Some(action),
            MenuItem::Separator(_) => None,
        }
    }
}

impl From<MenuAction> for MenuItem {
    fn from(action: MenuAction) -> Self {
        MenuItem::Action(action)
    }
}

impl From<MenuSeparator> for MenuItem {
    fn from(separator: MenuSeparator) -> Self {
        MenuItem::Separator(separator)
    }
}

/// An ordered list of menu entries.
#[derive(Debug, Clone, Default)]
pub struct DropdownMenu {
    items: Vec<MenuItem>,
}

impl DropdownMenu {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, builder style.
    pub fn with_item(mut self, item: impl Into<MenuItem>) -> Self {
        self.items.push(item.into());
        self
    }

    /// The entries in order.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the menu has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item.
    pub fn append(&mut self, item: impl Into<MenuItem>) {
        self.items.push(item.into());
    }

    /// Append an always enabled action.
    pub fn append_action<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn() -> Update + Send + Sync + 'static,
    {
        self.append(MenuAction::new(name).with_action(action));
    }

    /// Append an action whose status is computed when the menu is prepared for display.
    pub fn append_action_with_status<F, S>(&mut self, name: impl Into<String>, action: F, status: S)
    where
        F: Fn() -> Update + Send + Sync + 'static,
        S: Fn(&MenuAction) -> ActionStatus + Send + Sync + 'static,
    {
        self.append(
            MenuAction::new(name)
                .with_action(action)
                .with_status_callback(status),
        );
    }

    /// Append a separator to the sub-menu at `sub_menu_path`.
    pub fn append_separator(&mut self, sub_menu_path: impl Into<String>) {
        self.append(MenuSeparator::new(sub_menu_path));
    }

    /// Insert an item. `index` is clamped to the number of entries.
    pub fn insert(&mut self, index: usize, item: impl Into<MenuItem>) {
        let index = index.min(self.items.len());
        self.items.insert(index, item.into());
    }

    /// Insert an always enabled action.
    pub fn insert_action<F>(&mut self, index: usize, name: impl Into<String>, action: F)
    where
        F: Fn() -> Update + Send + Sync + 'static,
    {
        self.insert(index, MenuAction::new(name).with_action(action));
    }

    /// Insert a separator.
    pub fn insert_separator(&mut self, index: usize, sub_menu_path: impl Into<String>) {
        self.insert(index, MenuSeparator::new(sub_menu_path));
    }

    /// Remove the entry at `index`.
    pub fn remove_item_at(&mut self, index: usize) -> Option<MenuItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Recompute every action status from its status callback.
    pub fn prepare_for_display(&mut self, trigger: &TriggerEvent) {
        for item in &mut self.items {
            if let MenuItem::Action(action) = item {
                action.update_status(trigger);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(MenuAction::new("File/Export/PNG").path(), vec!["File", "Export", "PNG"]);
        assert_eq!(MenuAction::new("Open").path(), vec!["Open"]);
        assert_eq!(MenuSeparator::new("Sub/").path(), vec!["Sub", ""]);
        assert_eq!(MenuSeparator::new("").path(), vec![""]);
    }

    #[test]
    fn test_status_semantics() {
        assert!(ActionStatus::empty().is_hidden());
        assert!(ActionStatus::HIDDEN.is_hidden());
        assert!(!ActionStatus::CHECKED.is_hidden());
        assert!(!ActionStatus::DISABLED.is_enabled());
        assert!((ActionStatus::NORMAL | ActionStatus::CHECKED).is_enabled());
    }

    #[test]
    fn test_prepare_for_display_runs_status_callbacks() {
        let mut menu = DropdownMenu::new();
        menu.append_action_with_status("Paste", Update::empty, |action| {
            match action.trigger() {
                Some(trigger) if trigger.position.x > 100.0 => ActionStatus::DISABLED,
                _ => ActionStatus::NORMAL,
            }
        });
        menu.append(MenuAction::new("Copy").with_status(ActionStatus::CHECKED));

        menu.prepare_for_display(&TriggerEvent::at(Point::new(200.0, 0.0)));
        assert_eq!(menu.items()[0].as_action().unwrap().status(), ActionStatus::DISABLED);
        assert_eq!(menu.items()[1].as_action().unwrap().status(), ActionStatus::CHECKED);

        menu.prepare_for_display(&TriggerEvent::at(Point::new(50.0, 0.0)));
        assert_eq!(menu.items()[0].as_action().unwrap().status(), ActionStatus::NORMAL);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut menu = DropdownMenu::new();
        menu.append_action("B", Update::empty);
        menu.insert_action(0, "A", Update::empty);
        menu.insert_separator(99, "");

        let names: Vec<_> = menu.items().iter().map(|item| item.path().join("/")).collect();
        assert_eq!(names, vec!["A", "B", ""]);

        assert!(menu.remove_item_at(5).is_none());
        assert!(menu.remove_item_at(0).is_some());
        assert_eq!(menu.len(), 2);
        menu.clear();
        assert!(menu.is_empty());
    }

    #[test]
    fn test_user_data() {
        let action = MenuAction::new("Zoom").with_user_data(2.5_f32);
        assert_eq!(action.user_data::<f32>(), Some(&2.5));
        assert_eq!(action.user_data::<u32>(), None);
    }
}
