// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pooled menu panels and the tree built from a flat item list.

use cascade_core::host::{ElementId, Host};
use cascade_core::pool::ObjectPool;
use cascade_core::scheduler::Scheduler;
use cascade_core::update::Update;
use indexmap::IndexMap;
use kurbo::Point;
use nalgebra::Vector2;
use slotmap::new_key_type;
use std::collections::HashMap;

use super::classnames::*;
use super::error::DropdownError;
use super::manipulator::{apply_status_classes, ItemManipulator, ItemRef};
use super::model::MenuItem;
use super::position::{place_sub_panel, Placement};
use super::{DeferredTask, DropdownOptions, SetItem, SetMenu};

new_key_type! {
    pub(crate) struct PanelKey;
    pub(crate) struct ActionItemKey;
    pub(crate) struct SubItemKey;
    pub(crate) struct SeparatorKey;
}

/// A pooled menu panel: the panel element and the container holding its rows.
pub(crate) struct MenuPanel {
    pub element: ElementId,
    pub container: ElementId,
    pub action_items: Vec<ActionItemKey>,
    pub sub_items: Vec<SubItemKey>,
    pub separators: Vec<SeparatorKey>,
    /// Child panels by path segment, in insertion order
    pub sub_menus: IndexMap<String, PanelKey>,
    pub parent: Option<PanelKey>,
    /// Element of the row expanding this panel
    pub target: Option<ElementId>,
    pub expander: Option<SubItemKey>,
    pub open_sub_menu: Option<PanelKey>,
    pub placed: bool,
    pub depth: usize,
}

impl MenuPanel {
    fn create<H: Host + ?Sized>(host: &mut H) -> Self {
        let element = host.create_element();
        host.add_class(element, MENU);
        let container = host.create_element();
        host.add_class(container, MENU_CONTAINER);
        host.add_child(element, container);

        Self {
            element,
            container,
            action_items: Vec::new(),
            sub_items: Vec::new(),
            separators: Vec::new(),
            sub_menus: IndexMap::new(),
            parent: None,
            target: None,
            expander: None,
            open_sub_menu: None,
            placed: false,
            depth: 0,
        }
    }

    fn reset<H: Host + ?Sized>(&mut self, host: &mut H, retained: usize) {
        self.action_items.clear();
        self.action_items.shrink_to(retained);
        self.sub_items.clear();
        self.sub_items.shrink_to(retained);
        self.separators.clear();
        self.separators.shrink_to(retained);
        self.sub_menus.clear();
        self.sub_menus.shrink_to(retained);
        self.parent = None;
        self.target = None;
        self.expander = None;
        self.open_sub_menu = None;
        self.placed = false;
        self.depth = 0;

        host.set_position(self.element, None);
        host.clear_classes(self.element);
        host.add_class(self.element, MENU);
        host.clear_children(self.container);
        host.clear_children(self.element);
        host.add_child(self.element, self.container);
        host.remove_from_parent(self.element);
    }
}

/// Every pool of the dropdown plus the deferred work on its rows.
pub(crate) struct MenuStore<H: Host + 'static> {
    pub panels: ObjectPool<PanelKey, MenuPanel, H>,
    pub action_items: ObjectPool<ActionItemKey, ItemManipulator, H>,
    pub sub_items: ObjectPool<SubItemKey, ItemManipulator, H>,
    pub separators: ObjectPool<SeparatorKey, ElementId, H>,
    /// Row element to row, for event routing
    pub routes: HashMap<ElementId, ItemRef>,
    pub tasks: Scheduler<DeferredTask>,
    /// Bumped on every build, stale tasks carry an older value
    pub generation: u64,
    pub container: ElementId,
    pub sub_menu_open_delay: u64,
    pub open_transition_delay: u64,
    set_item: SetItem<H>,
    set_menu: SetMenu<H>,
}

impl<H: Host + 'static> MenuStore<H> {
    pub fn new(host: &mut H, container: ElementId, options: &DropdownOptions<H>) -> Self {
        let config = &options.config;
        let pools = config.pools;
        let retained = config.retained_capacity;

        let make_item = options.make_item.clone();
        let mut action_items = ObjectPool::new(pools.auto_expand, move |host: &mut H| {
            let element = make_item(host);
            host.add_class(element, ITEM);
            host.set_focusable(element, true);
            ItemManipulator::action(element)
        })
        .with_reset(|item: &mut ItemManipulator, host: &mut H| {
            item.reset(host);
            host.remove_from_parent(item.element);
        });
        action_items.ensure_minimum_size(pools.action_items, host);

        let make_item = options.make_item.clone();
        let mut sub_items = ObjectPool::new(pools.auto_expand, move |host: &mut H| {
            let element = make_item(host);
            host.add_class(element, ITEM);
            host.add_class(element, SUB_ITEM);
            host.set_focusable(element, true);
            ItemManipulator::sub_menu(element)
        })
        .with_reset(|item: &mut ItemManipulator, host: &mut H| {
            item.reset(host);
            host.remove_from_parent(item.element);
        });
        sub_items.ensure_minimum_size(pools.sub_items, host);

        let make_separator = options.make_separator.clone();
        let mut separators = ObjectPool::new(pools.auto_expand, move |host: &mut H| {
            let element = make_separator(host);
            host.add_class(element, SEPARATOR);
            element
        })
        .with_reset(|element: &mut ElementId, host: &mut H| host.remove_from_parent(*element));
        separators.ensure_minimum_size(pools.separators, host);

        let mut panels = ObjectPool::new(pools.auto_expand, |host: &mut H| MenuPanel::create(host))
            .with_reset(move |panel: &mut MenuPanel, host: &mut H| panel.reset(host, retained));
        panels.ensure_minimum_size(pools.menus, host);

        Self {
            panels,
            action_items,
            sub_items,
            separators,
            routes: HashMap::new(),
            tasks: Scheduler::new(),
            generation: 0,
            container,
            sub_menu_open_delay: config.sub_menu_open_delay_ms,
            open_transition_delay: config.open_transition_delay_ms,
            set_item: options.set_item.clone(),
            set_menu: options.set_menu.clone(),
        }
    }

    fn panel(&self, key: PanelKey) -> Result<&MenuPanel, DropdownError> {
        self.panels.get(key).ok_or(DropdownError::MissingElement("menu"))
    }

    fn panel_mut(&mut self, key: PanelKey) -> Result<&mut MenuPanel, DropdownError> {
        self.panels.get_mut(key).ok_or(DropdownError::MissingElement("menu"))
    }

    /// Check out and prepare the root panel of a new tree.
    pub fn create_root(&mut self, host: &mut H) -> Result<PanelKey, DropdownError> {
        let root = self.panels.get_pooled(host)?;
        let (element, container) = {
            let panel = self.panel(root)?;
            (panel.element, panel.container)
        };
        host.add_class(element, &menu_depth(0));
        (self.set_menu)(host, container, &[], 0);
        Ok(root)
    }

    /// Add `item` below `panel`, creating the sub-menus its path names on the way.
    ///
    /// Every pooled row or panel is linked into the tree right after check out,
    /// so a failing pool never leaks an instance.
    pub fn add_item(
        &mut self,
        host: &mut H,
        panel: PanelKey,
        item: &MenuItem,
        path: &[&str],
        level: usize,
    ) -> Result<(), DropdownError> {
        if path.is_empty() || level + 1 >= path.len() {
            return self.add_leaf(host, panel, item, path, level);
        }

        let existing = self.panel(panel)?.sub_menus.get(path[level]).copied();
        let child = match existing {
            Some(child) => child,
            None => self.add_sub_menu(host, panel, item, path, level)?,
        };

        // keep the child in the tree so the host lays it out with the root
        let parent_element = self.panel(panel)?.element;
        let child_element = self.panel(child)?.element;
        host.add_child(parent_element, child_element);

        self.add_item(host, child, item, path, level + 1)
    }

    fn add_leaf(
        &mut self,
        host: &mut H,
        panel: PanelKey,
        item: &MenuItem,
        path: &[&str],
        level: usize,
    ) -> Result<(), DropdownError> {
        let container = self.panel(panel)?.container;

        match item {
            MenuItem::Action(action) => {
                let key = self.action_items.get_pooled(host)?;
                self.panel_mut(panel)?.action_items.push(key);

                let element = match self.action_items.get_mut(key) {
                    Some(row) => {
                        row.assign_action(host, panel, action.callback().cloned(), action.status());
                        row.element
                    },
                    None => return Err(DropdownError::MissingElement("menu item")),
                };
                self.routes.insert(element, ItemRef::Action(key));
                (self.set_item)(host, element, item, path, level);
                apply_status_classes(host, element, action.status());
                host.add_child(container, element);
            },
            MenuItem::Separator(_) => {
                let key = self.separators.get_pooled(host)?;
                self.panel_mut(panel)?.separators.push(key);

                if let Some(&element) = self.separators.get(key) {
                    host.add_child(container, element);
                }
            },
        }
        Ok(())
    }

    fn add_sub_menu(
        &mut self,
        host: &mut H,
        panel: PanelKey,
        item: &MenuItem,
        path: &[&str],
        level: usize,
    ) -> Result<PanelKey, DropdownError> {
        let container = self.panel(panel)?.container;

        let row = self.sub_items.get_pooled(host)?;
        self.panel_mut(panel)?.sub_items.push(row);
        let child = self.panels.get_pooled(host)?;
        self.panel_mut(panel)?.sub_menus.insert(path[level].to_string(), child);

        let row_element = match self.sub_items.get_mut(row) {
            Some(manipulator) => {
                manipulator.assign_sub_menu(host, panel, child);
                manipulator.element
            },
            None => return Err(DropdownError::MissingElement("menu item")),
        };

        let (child_element, child_container) = {
            let child_panel = self.panel_mut(child)?;
            child_panel.parent = Some(panel);
            child_panel.target = Some(row_element);
            child_panel.expander = Some(row);
            child_panel.depth = level + 1;
            (child_panel.element, child_panel.container)
        };

        self.routes.insert(row_element, ItemRef::SubMenu(row));
        (self.set_item)(host, row_element, item, path, level);
        host.add_child(container, row_element);

        host.add_class(child_element, &menu_depth(level + 1));
        (self.set_menu)(host, child_container, path, level + 1);
        Ok(child)
    }

    fn release_row(&mut self, host: &mut H, item: ItemRef) {
        let Some(row) = self.item_mut(item) else {
            return;
        };
        let (element, pending) = (row.element, row.pending.take());
        if let Some(handle) = pending {
            self.tasks.cancel(handle);
        }
        host.blur(element);
        host.remove_from_parent(element);
    }

    /// Give a panel, its rows and all of its descendants back to their pools.
    pub fn return_panel(&mut self, host: &mut H, panel: PanelKey) -> Result<(), DropdownError> {
        let (actions, sub_items, separators, children) = {
            let Some(menu) = self.panels.get_mut(panel) else {
                return Ok(());
            };
            menu.open_sub_menu = None;
            (
                menu.action_items.drain(..).collect::<Vec<_>>(),
                menu.sub_items.drain(..).collect::<Vec<_>>(),
                menu.separators.drain(..).collect::<Vec<_>>(),
                menu.sub_menus.drain(..).map(|(_, child)| child).collect::<Vec<_>>(),
            )
        };

        for key in actions {
            self.release_row(host, ItemRef::Action(key));
            self.action_items.return_to_pool(key, host)?;
        }
        for key in sub_items {
            self.release_row(host, ItemRef::SubMenu(key));
            self.sub_items.return_to_pool(key, host)?;
        }
        for key in separators {
            self.separators.return_to_pool(key, host)?;
        }
        for child in children {
            self.return_panel(host, child)?;
        }

        self.panels.return_to_pool(panel, host)?;
        Ok(())
    }

    /// Close the open sub-menu of `panel` and everything opened below it.
    ///
    /// Returns `false` if nothing was open.
    pub fn close_sub_menus(&mut self, host: &mut H, panel: PanelKey) -> bool {
        let open = self.panels.get_mut(panel).and_then(|menu| menu.open_sub_menu.take());
        match open {
            Some(open) => {
                self.close_panel(host, open);
                true
            },
            None => false,
        }
    }

    fn close_panel(&mut self, host: &mut H, panel: PanelKey) {
        let Some(menu) = self.panels.get(panel) else {
            return;
        };
        let (element, container, target) = (menu.element, menu.container, menu.target);

        let rows = host.children(container).to_vec();
        for row in rows {
            host.remove_class(row, SUB_ITEM_OPENED);
            host.remove_class(row, ITEM_HOVERED);
        }
        host.remove_from_parent(element);
        host.remove_class(element, MENU_OPEN);
        if let Some(target) = target {
            host.remove_class(target, SUB_ITEM_OPENED);
        }

        self.close_sub_menus(host, panel);
    }

    /// Show `child` next to its row in `panel`, closing whatever sibling was open.
    pub fn open_sub_menu(&mut self, host: &mut H, panel: PanelKey, child: PanelKey) -> Update {
        let current = self.panels.get(panel).and_then(|menu| menu.open_sub_menu);
        if current == Some(child) {
            return Update::empty();
        }
        if current.is_some() {
            self.close_sub_menus(host, panel);
        }

        let Some(menu) = self.panels.get_mut(panel) else {
            return Update::empty();
        };
        menu.open_sub_menu = Some(child);
        let parent_element = menu.element;
        let Some(child_menu) = self.panels.get(child) else {
            return Update::empty();
        };
        let (child_element, target, placed) = (child_menu.element, child_menu.target, child_menu.placed);

        if let Some(target) = target {
            host.add_class(target, SUB_ITEM_OPENED);
        }
        host.add_child(parent_element, child_element);
        if !placed {
            self.place_sub_menu(host, panel, child);
        }

        let generation = self.generation;
        self.tasks.schedule_after(
            self.open_transition_delay,
            DeferredTask::RevealMenu { panel: child, generation },
        );
        Update::LAYOUT | Update::DRAW
    }

    /// Place a sub-menu that is opened before the tree was finalized.
    fn place_sub_menu(&mut self, host: &mut H, panel: PanelKey, child: PanelKey) {
        let (Some(menu), Some(child_menu)) = (self.panels.get(panel), self.panels.get(child)) else {
            return;
        };
        let Some(target) = child_menu.target else {
            return;
        };

        let parent_bound = host.world_bound(menu.element);
        let row = host.world_bound(target) - parent_bound.origin().to_vec2();
        let size = host.world_bound(child_menu.element).size();
        let placement = place_sub_panel(
            Vector2::new(parent_bound.x0, parent_bound.y0),
            row,
            Vector2::new(size.width, size.height),
            host.margins(child_menu.element),
            host.world_bound(self.container),
        );

        log::trace!("Placing sub-menu at depth {} lazily", child_menu.depth);
        self.apply_placement(host, child, placement);
    }

    pub fn apply_placement(&mut self, host: &mut H, panel: PanelKey, placement: Placement) {
        let Some(menu) = self.panels.get_mut(panel) else {
            return;
        };
        menu.placed = true;

        let position = Point::new(placement.position.x, placement.position.y);
        host.set_position(menu.element, Some(position));
        host.set_class_enabled(menu.element, MENU_RIGHTWARDS, placement.flipped_x);
        host.set_class_enabled(menu.element, MENU_UPWARDS, placement.flipped_y);
    }

    /// Add the open class once the panel's transition may play.
    pub fn reveal(&mut self, host: &mut H, panel: PanelKey) -> Update {
        if !self.panels.is_in_use(panel) {
            return Update::empty();
        }
        let Some(menu) = self.panels.get(panel) else {
            return Update::empty();
        };

        let shown = match menu.parent {
            None => true,
            Some(parent) => self
                .panels
                .get(parent)
                .is_some_and(|parent| parent.open_sub_menu == Some(panel)),
        };
        if !shown {
            return Update::empty();
        }
        host.add_class(menu.element, MENU_OPEN);
        Update::DRAW
    }

    /// Find the panel at a sub-menu path below `root`.
    pub fn find_panel(&self, root: PanelKey, path: &[&str]) -> Option<PanelKey> {
        path.iter().try_fold(root, |panel, segment| {
            self.panels.get(panel)?.sub_menus.get(*segment).copied()
        })
    }

    /// Find the checked out row an event target belongs to, walking up from `target`.
    pub fn route(&self, host: &H, target: ElementId) -> Option<ItemRef> {
        let mut current = Some(target);
        while let Some(element) = current {
            if let Some(&item) = self.routes.get(&element) {
                if self.is_checked_out(item) && self.item(item).is_some_and(|row| row.element == element) {
                    return Some(item);
                }
            }
            if element == self.container {
                return None;
            }
            current = host.parent(element);
        }
        None
    }
}
