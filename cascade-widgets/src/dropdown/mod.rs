// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Dropdown
//!
//! A nested dropdown (or context) menu built from a flat [DropdownMenu].
//!
//! Opening a dropdown attaches a [BlockingLayer] to the container and builds
//! one panel per sub-menu out of pooled elements. The root panel is placed
//! once the host reports its layout pass settled, sub-panels open on hover or
//! keyboard navigation and flip when they would leave the container.
//!
//! The host drives everything that happens later:
//!
//! - [Dropdown::handle_event] for every event routed to the layer or anything above it
//! - [Dropdown::advance] with the current time, for hover delays and open transitions
//! - [Dropdown::on_layout_settled] after each layout pass, for placement
//!
//! ```ignore
//! let mut dropdown = Dropdown::new(&mut host, window, DropdownOptions::default())?;
//! let mut menu = DropdownMenu::new()
//!     .with_item(MenuAction::new("Open").with_action(open_file))
//!     .with_item(MenuAction::new("Export/PNG").with_action(export_png));
//!
//! dropdown.open(&mut host, &mut menu, button_bounds, None)?;
//! ```

/// Contains the style class names.
pub mod classnames;

/// Contains the [DropdownConfig].
pub mod config;

/// Contains the [DropdownError].
pub mod error;

/// Contains the menu model.
pub mod model;

/// Contains the panel placement math.
pub mod position;

mod manipulator;
mod menu;
mod traverse;

pub use config::{BlockingConfig, DropdownConfig, PoolConfig};
pub use error::DropdownError;
pub use model::{
    ActionCallback, ActionStatus, DropdownMenu, MenuAction, MenuItem, MenuSeparator, StatusCallback, TriggerEvent,
};

use crate::blocking_layer::{BlockingBehavior, BlockingLayer};
use cascade_core::focus::{find_first_focusable_child, find_last_focusable_child};
use cascade_core::host::{ElementId, Host, NavigationDirection, PickingMode, UiEvent};
use cascade_core::scheduler::TaskHandle;
use cascade_core::update::Update;
use classnames::*;
use kurbo::{Point, Rect, Size};
use manipulator::{ItemRef, ItemResponse};
use menu::{MenuStore, PanelKey};
use nalgebra::Vector2;
use position::{place_root, Placement};
use std::sync::Arc;
use traverse::{walk, DetachVisitor, PlacementVisitor, StatusVisitor};

/// Creates a row (or separator) element.
pub type MakeElement<H> = Arc<dyn Fn(&mut H) -> ElementId + Send + Sync>;

/// Fills a row element for an item: `(host, element, item, path, level)`.
///
/// `path[level]` is the label of the row. Sub-menu rows get the item that
/// first created the sub-menu.
pub type SetItem<H> = Arc<dyn Fn(&mut H, ElementId, &MenuItem, &[&str], usize) + Send + Sync>;

/// Prepares the container of a freshly checked out panel: `(host, container, path, depth)`.
pub type SetMenu<H> = Arc<dyn Fn(&mut H, ElementId, &[&str], usize) + Send + Sync>;

/// Element factories and settings for a [Dropdown].
pub struct DropdownOptions<H> {
    make_item: MakeElement<H>,
    set_item: SetItem<H>,
    make_separator: MakeElement<H>,
    set_menu: SetMenu<H>,
    config: DropdownConfig,
}

impl<H: Host + 'static> DropdownOptions<H> {
    /// Set the row factory.
    pub fn with_make_item<F>(mut self, make_item: F) -> Self
    where
        F: Fn(&mut H) -> ElementId + Send + Sync + 'static,
    {
        self.make_item = Arc::new(make_item);
        self
    }

    /// Set the callback filling a row for an item.
    pub fn with_set_item<F>(mut self, set_item: F) -> Self
    where
        F: Fn(&mut H, ElementId, &MenuItem, &[&str], usize) + Send + Sync + 'static,
    {
        self.set_item = Arc::new(set_item);
        self
    }

    /// Set the separator factory.
    pub fn with_make_separator<F>(mut self, make_separator: F) -> Self
    where
        F: Fn(&mut H) -> ElementId + Send + Sync + 'static,
    {
        self.make_separator = Arc::new(make_separator);
        self
    }

    /// Set the callback preparing a panel container.
    pub fn with_set_menu<F>(mut self, set_menu: F) -> Self
    where
        F: Fn(&mut H, ElementId, &[&str], usize) + Send + Sync + 'static,
    {
        self.set_menu = Arc::new(set_menu);
        self
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: DropdownConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &DropdownConfig {
        &self.config
    }
}

impl<H: Host + 'static> Default for DropdownOptions<H> {
    fn default() -> Self {
        Self {
            make_item: Arc::new(make_default_item::<H>),
            set_item: Arc::new(set_default_item::<H>),
            make_separator: Arc::new(make_default_separator::<H>),
            set_menu: Arc::new(|_: &mut H, _: ElementId, _: &[&str], _: usize| {}),
            config: DropdownConfig::default(),
        }
    }
}

impl<H> Clone for DropdownOptions<H> {
    fn clone(&self) -> Self {
        Self {
            make_item: self.make_item.clone(),
            set_item: self.set_item.clone(),
            make_separator: self.make_separator.clone(),
            set_menu: self.set_menu.clone(),
            config: self.config.clone(),
        }
    }
}

/// The default row: named `icon`, `text` and `arrow` children, none of them pickable.
pub fn make_default_item<H: Host + ?Sized>(host: &mut H) -> ElementId {
    let item = host.create_element();
    for (name, class) in [("icon", ITEM_ICON), ("text", ITEM_TEXT), ("arrow", ITEM_ARROW)] {
        let child = host.create_element();
        host.set_name(child, name);
        host.add_class(child, class);
        host.set_picking(child, PickingMode::Ignore);
        host.add_child(item, child);
    }
    item
}

/// Writes the label into the `text` child of a default row.
pub fn set_default_item<H: Host + ?Sized>(
    host: &mut H,
    element: ElementId,
    _: &MenuItem,
    path: &[&str],
    level: usize,
) {
    let label = path.get(level).copied().unwrap_or_default();
    if let Some(text) = host.find_named(element, "text") {
        host.set_text(text, label);
    }
}

/// The default separator: a row holding a line.
pub fn make_default_separator<H: Host + ?Sized>(host: &mut H) -> ElementId {
    let separator = host.create_element();
    host.set_picking(separator, PickingMode::Ignore);
    let line = host.create_element();
    host.add_class(line, SEPARATOR_LINE);
    host.set_picking(line, PickingMode::Ignore);
    host.add_child(separator, line);
    separator
}

/// What the root panel opens next to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Below the rectangle (world space), e.g. the bounds of a button.
    Rect(Rect),
    /// At a point (world space), e.g. the pointer for a context menu.
    Point(Point),
}

impl Anchor {
    fn to_rect(self) -> Rect {
        match self {
            Anchor::Rect(rect) => rect,
            Anchor::Point(point) => Rect::from_origin_size(point, Size::ZERO),
        }
    }
}

impl From<Rect> for Anchor {
    fn from(rect: Rect) -> Self {
        Anchor::Rect(rect)
    }
}

impl From<Point> for Anchor {
    fn from(point: Point) -> Self {
        Anchor::Point(point)
    }
}

/// Work deferred to a later tick or layout pass.
///
/// Every task carries the build generation it was scheduled for and is
/// dropped when the tree was rebuilt in the meantime.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DeferredTask {
    /// Hover delay of a row ran out.
    Activate { item: ItemRef, generation: u64 },
    /// A freshly shown panel may play its open transition.
    RevealMenu { panel: PanelKey, generation: u64 },
    /// Layout settled, place the tree.
    Finalize { generation: u64 },
}

/// A snapshot of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuInfo {
    /// The panel element.
    pub element: ElementId,
    /// The element holding the rows.
    pub container: ElementId,
    /// Nesting depth, `0` for the root.
    pub depth: usize,
    /// Action rows in insertion order.
    pub action_items: Vec<ElementId>,
    /// Sub-menu rows in insertion order.
    pub sub_items: Vec<ElementId>,
    /// Separator rows in insertion order.
    pub separators: Vec<ElementId>,
    /// Names of the sub-menus in insertion order.
    pub sub_menus: Vec<String>,
    /// Name of the open sub-menu.
    pub open_sub_menu: Option<String>,
}

/// A snapshot of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemInfo {
    /// The row can be executed.
    pub enabled: bool,
    /// The row is not displayed.
    pub hidden: bool,
    /// The row expands a sub-menu.
    pub sub_menu: bool,
    /// A hover activation is scheduled.
    pub activation_pending: bool,
}

/// Usage of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolUsage {
    /// Instances the pool owns.
    pub size: usize,
    /// Instances checked out.
    pub in_use: usize,
    /// Instances ready to be handed out.
    pub available: usize,
}

/// Usage of every pool of a [Dropdown].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Action rows.
    pub action_items: PoolUsage,
    /// Sub-menu rows.
    pub sub_items: PoolUsage,
    /// Separators.
    pub separators: PoolUsage,
    /// Panels.
    pub menus: PoolUsage,
}

/// A pooled, nested dropdown menu living in a host container.
pub struct Dropdown<H: Host + 'static> {
    container: ElementId,
    layer: BlockingLayer,
    store: MenuStore<H>,
    root_menu: Option<PanelKey>,
    anchor: Rect,
    finalize: Option<TaskHandle>,
    config: DropdownConfig,
}

impl<H: Host + 'static> Dropdown<H> {
    /// Create a closed dropdown that opens inside `container` and pre-fill its pools.
    pub fn new(host: &mut H, container: ElementId, options: DropdownOptions<H>) -> Result<Self, DropdownError> {
        if !host.contains(container) {
            return Err(DropdownError::MissingElement("container"));
        }

        let layer = BlockingLayer::new(host, options.config.blocking.behavior());
        let store = MenuStore::new(host, container, &options);
        log::debug!(
            "Dropdown created with {} action rows and {} panels pooled",
            store.action_items.pool_size(),
            store.panels.pool_size()
        );

        Ok(Self {
            container,
            layer,
            store,
            root_menu: None,
            anchor: Rect::ZERO,
            finalize: None,
            config: options.config,
        })
    }

    /// Open `menu` next to `anchor`, closing whatever was open before.
    ///
    /// Status callbacks run first, with `trigger` (or the anchor position when
    /// there is none). On error the dropdown is left closed.
    pub fn open(
        &mut self,
        host: &mut H,
        menu: &mut DropdownMenu,
        anchor: impl Into<Anchor>,
        trigger: Option<TriggerEvent>,
    ) -> Result<Update, DropdownError> {
        let mut update = self.close(host);

        let anchor = anchor.into().to_rect();
        self.anchor = anchor;
        let trigger = trigger.unwrap_or_else(|| TriggerEvent::at(anchor.origin()));
        menu.prepare_for_display(&trigger);

        if let Err(err) = self.build(host, menu) {
            log::error!("Failed to build dropdown: {err}");
            self.close(host);
            return Err(err);
        }

        self.layer.attach(host, self.container);
        if let Some(focused) = host.focused() {
            host.blur(focused);
        }
        host.focus(self.layer.element());

        update |= Update::LAYOUT | Update::DRAW | Update::FOCUS;
        Ok(update)
    }

    /// (Re)build the panel tree for `menu` under the blocking layer.
    ///
    /// The previous tree goes back to the pools first and work scheduled for it
    /// is dropped. The new tree is placed once the next layout settles.
    pub fn build(&mut self, host: &mut H, menu: &DropdownMenu) -> Result<(), DropdownError> {
        if let Some(root) = self.root_menu.take() {
            self.store.return_panel(host, root)?;
        }
        self.store.generation += 1;
        if let Some(handle) = self.finalize.take() {
            self.store.tasks.cancel(handle);
        }

        let root = self.store.create_root(host)?;
        self.root_menu = Some(root);

        let generation = self.store.generation;
        self.store.tasks.schedule_after(
            self.store.open_transition_delay,
            DeferredTask::RevealMenu { panel: root, generation },
        );
        if let Some(element) = self.root_element() {
            host.add_child(self.layer.element(), element);
        }

        for item in menu.items() {
            let path = item.path();
            self.store.add_item(host, root, item, &path, 0)?;
        }
        walk(&mut self.store, host, &mut StatusVisitor, root, &());
        self.finalize = Some(self.store.tasks.schedule_next_layout(DeferredTask::Finalize { generation }));

        log::debug!("Built dropdown generation {generation} from {} items", menu.len());
        Ok(())
    }

    /// Place the root next to the anchor and every sub-panel next to its row.
    fn finish(&mut self, host: &mut H) -> Update {
        let (Some(root), Some(root_element)) = (self.root_menu, self.root_element()) else {
            return Update::empty();
        };

        let bounds = host.world_bound(self.container);
        let size = host.world_bound(root_element).size();
        let margin = host.margins(root_element);
        let placement = place_root(self.anchor, Vector2::new(size.width, size.height), margin, bounds);

        let origin = placement.position + Vector2::new(margin.x0, margin.y0);
        walk(&mut self.store, host, &mut PlacementVisitor { root, bounds }, root, &origin);
        walk(&mut self.store, host, &mut DetachVisitor, root, &());

        let layer = self.layer.element();
        let local = host.world_to_local(layer, Point::new(placement.position.x, placement.position.y));
        self.store.apply_placement(
            host,
            root,
            Placement {
                position: Vector2::new(local.x, local.y),
                ..placement
            },
        );
        host.add_child(layer, root_element);

        log::trace!("Dropdown placed at {local:?}");
        Update::LAYOUT | Update::DRAW
    }

    /// Close the dropdown and return every element to its pool. Closing a closed dropdown does nothing.
    pub fn close(&mut self, host: &mut H) -> Update {
        let Some(root) = self.root_menu.take() else {
            return Update::empty();
        };

        if let Err(err) = self.store.return_panel(host, root) {
            log::error!("Failed to return dropdown to its pools: {err}");
        }
        self.store.tasks.clear();
        self.finalize = None;
        self.layer.detach(host);

        log::debug!("Dropdown closed");
        Update::LAYOUT | Update::DRAW | Update::FOCUS
    }

    /// Handle an event the host routed to `target`.
    pub fn handle_event(&mut self, host: &mut H, target: ElementId, event: UiEvent) -> Update {
        if self.root_menu.is_none() {
            return Update::empty();
        }

        let response = self.layer.handle_event(host, target, event);
        let mut update = response.update;
        if response.close {
            update |= self.close(host);
            if let Some(picked) = response.redispatch {
                host.redispatch(picked, event);
            }
            return update;
        }

        if target == self.layer.element() {
            if let UiEvent::NavigationMove(direction) = event {
                update |= self.focus_root_row(host, direction);
            }
            return update;
        }

        let Some(item) = self.store.route(host, target) else {
            log::trace!("No menu row owns {target:?}, ignoring {event:?}");
            return update;
        };
        match self.store.handle_item_event(host, item, event) {
            ItemResponse::Handled(item_update) => update | item_update,
            ItemResponse::Execute(callback) => {
                update |= self.close(host);
                if let Some(callback) = callback {
                    update |= callback() | Update::EVAL;
                }
                update
            },
        }
    }

    fn focus_root_row(&mut self, host: &mut H, direction: NavigationDirection) -> Update {
        let Some(container) = self.root_menu.and_then(|root| self.store.panels.get(root)).map(|menu| menu.container)
        else {
            return Update::empty();
        };

        let row = match direction {
            NavigationDirection::Down | NavigationDirection::Next => find_first_focusable_child(host, container),
            NavigationDirection::Up | NavigationDirection::Previous => find_last_focusable_child(host, container),
            NavigationDirection::Left | NavigationDirection::Right => None,
        };
        match row {
            Some(row) => {
                host.focus(row);
                Update::FOCUS
            },
            None => Update::empty(),
        }
    }

    /// Advance the clock to `now_ms` and run the due hover and transition tasks.
    pub fn advance(&mut self, host: &mut H, now_ms: u64) -> Update {
        let mut update = Update::empty();
        for task in self.store.tasks.take_due(now_ms) {
            update |= self.run_task(host, task);
        }
        update
    }

    /// Run the tasks that waited for the host's layout pass.
    pub fn on_layout_settled(&mut self, host: &mut H) -> Update {
        let mut update = Update::empty();
        for task in self.store.tasks.take_next_layout() {
            update |= self.run_task(host, task);
        }
        update
    }

    fn run_task(&mut self, host: &mut H, task: DeferredTask) -> Update {
        let current = self.store.generation;
        match task {
            DeferredTask::Activate { item, generation } if generation == current && self.store.is_checked_out(item) => {
                self.store.activate(host, item)
            },
            DeferredTask::RevealMenu { panel, generation } if generation == current => self.store.reveal(host, panel),
            DeferredTask::Finalize { generation } if generation == current => {
                self.finalize = None;
                self.finish(host)
            },
            task => {
                log::trace!("Dropping stale task {task:?}");
                Update::empty()
            },
        }
    }

    /// Check whether the dropdown is open and its layer attached.
    pub fn is_open(&self, host: &H) -> bool {
        self.root_menu.is_some() && self.layer.is_attached_to(host, self.container)
    }

    /// Build generation, incremented on every build.
    pub fn generation(&self) -> u64 {
        self.store.generation
    }

    /// Snapshot of the panel at a sub-menu path, `&[]` being the root.
    pub fn menu_at(&self, path: &[&str]) -> Option<MenuInfo> {
        let panel = self.store.find_panel(self.root_menu?, path)?;
        let menu = self.store.panels.get(panel)?;

        let name_of = |key: PanelKey| {
            menu.sub_menus
                .iter()
                .find(|(_, child)| **child == key)
                .map(|(name, _)| name.clone())
        };

        Some(MenuInfo {
            element: menu.element,
            container: menu.container,
            depth: menu.depth,
            action_items: menu
                .action_items
                .iter()
                .filter_map(|&key| self.store.action_items.get(key))
                .map(|row| row.element)
                .collect(),
            sub_items: menu
                .sub_items
                .iter()
                .filter_map(|&key| self.store.sub_items.get(key))
                .map(|row| row.element)
                .collect(),
            separators: menu
                .separators
                .iter()
                .filter_map(|&key| self.store.separators.get(key).copied())
                .collect(),
            sub_menus: menu.sub_menus.keys().cloned().collect(),
            open_sub_menu: menu.open_sub_menu.and_then(name_of),
        })
    }

    /// Snapshot of the row owning `element`, if it is part of the open tree.
    pub fn item_info(&self, element: ElementId) -> Option<ItemInfo> {
        let item = *self.store.routes.get(&element)?;
        if !self.store.is_checked_out(item) {
            return None;
        }
        let row = self.store.item(item)?;

        Some(ItemInfo {
            enabled: row.enabled(),
            hidden: row.hidden(),
            sub_menu: matches!(item, ItemRef::SubMenu(_)),
            activation_pending: row.pending.is_some_and(|handle| self.store.tasks.is_pending(handle)),
        })
    }

    /// Usage of every pool.
    pub fn pool_stats(&self) -> PoolStats {
        let store = &self.store;
        PoolStats {
            action_items: PoolUsage {
                size: store.action_items.pool_size(),
                in_use: store.action_items.in_use(),
                available: store.action_items.available(),
            },
            sub_items: PoolUsage {
                size: store.sub_items.pool_size(),
                in_use: store.sub_items.in_use(),
                available: store.sub_items.available(),
            },
            separators: PoolUsage {
                size: store.separators.pool_size(),
                in_use: store.separators.in_use(),
                available: store.separators.available(),
            },
            menus: PoolUsage {
                size: store.panels.pool_size(),
                in_use: store.panels.in_use(),
                available: store.panels.available(),
            },
        }
    }

    /// The hover delay before a row activates, in milliseconds.
    pub fn sub_menu_open_delay(&self) -> u64 {
        self.store.sub_menu_open_delay
    }

    /// Change the hover delay. Applies to hovers starting afterwards.
    pub fn set_sub_menu_open_delay(&mut self, delay_ms: u64) {
        self.store.sub_menu_open_delay = delay_ms;
        self.config.sub_menu_open_delay_ms = delay_ms;
    }

    /// Change how the blocking layer reacts.
    pub fn set_blocking_behavior(&mut self, host: &mut H, behavior: BlockingBehavior) {
        self.layer.set_behavior(host, behavior);
    }

    /// The blocking layer element.
    pub fn layer_element(&self) -> ElementId {
        self.layer.element()
    }

    /// The root panel element while open.
    pub fn root_element(&self) -> Option<ElementId> {
        self.root_menu
            .and_then(|root| self.store.panels.get(root))
            .map(|menu| menu.element)
    }

    /// The container the dropdown opens in.
    pub fn container(&self) -> ElementId {
        self.container
    }

    /// The configuration the dropdown was created with.
    pub fn config(&self) -> &DropdownConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::headless::HeadlessHost;

    #[test]
    fn test_default_item_layout() {
        let mut host = HeadlessHost::new();
        let item = make_default_item(&mut host);
        let action: MenuItem = MenuAction::new("File/Open").into();
        set_default_item(&mut host, item, &action, &["File", "Open"], 1);

        let text = host.find_named(item, "text").unwrap();
        assert_eq!(host.text(text), Some("Open"));
        assert!(host.has_class(text, ITEM_TEXT));
        assert_eq!(host.picking(text), PickingMode::Ignore);
        assert_eq!(host.children(item).len(), 3);
    }

    #[test]
    fn test_missing_container() {
        let mut host = HeadlessHost::new();
        let result = Dropdown::new(&mut host, ElementId(99), DropdownOptions::default());
        assert!(matches!(result, Err(DropdownError::MissingElement("container"))));
    }

    #[test]
    fn test_anchor_conversion() {
        let point = Anchor::from(Point::new(4.0, 5.0));
        assert_eq!(point.to_rect(), Rect::new(4.0, 5.0, 4.0, 5.0));
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Anchor::from(rect).to_rect(), rect);
    }
}
