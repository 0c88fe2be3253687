#![allow(dead_code)]

use cascade_core::headless::{ClassRule, HeadlessHost};
use cascade_core::host::{ElementId, Host};
use cascade_widgets::dropdown::classnames::{ITEM_HIDDEN, MENU};
use cascade_widgets::dropdown::{Dropdown, DropdownConfig, DropdownMenu, DropdownOptions};
use kurbo::{Rect, Size};

pub struct Fixture {
    pub host: HeadlessHost,
    pub window: ElementId,
    pub button: ElementId,
    pub dropdown: Dropdown<HeadlessHost>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(DropdownConfig::default())
    }

    /// A 400x300 window with a 100x30 button in its top-left corner.
    pub fn with_config(config: DropdownConfig) -> Self {
        let mut host = HeadlessHost::new();
        host.style(MENU, ClassRule::absolute());
        host.style(ITEM_HIDDEN, ClassRule::hidden());

        let window = host.create_root(400.0, 300.0);
        let button = host.create_element();
        host.set_size(button, Size::new(100.0, 30.0));
        host.set_focusable(button, true);
        host.add_child(window, button);

        let dropdown = Dropdown::new(&mut host, window, DropdownOptions::default().with_config(config)).unwrap();

        Self {
            host,
            window,
            button,
            dropdown,
        }
    }

    /// Open below the button and let the layout settle.
    pub fn open(&mut self, menu: &mut DropdownMenu) {
        let anchor = self.host.world_bound(self.button);
        self.open_at(menu, anchor);
    }

    pub fn open_at(&mut self, menu: &mut DropdownMenu, anchor: Rect) {
        self.dropdown.open(&mut self.host, menu, anchor, None).unwrap();
        self.dropdown.on_layout_settled(&mut self.host);
    }

    /// Label of a default row.
    pub fn label(&self, row: ElementId) -> Option<&str> {
        let text = self.host.find_named(row, "text")?;
        self.host.text(text)
    }
}
