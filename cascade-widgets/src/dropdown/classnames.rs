// SPDX-License-Identifier: MIT OR Apache-2.0

//! Style classes the dropdown puts on host elements.
//!
//! Classes are pure state flags; the host stylesheet decides what they look like.

/// The blocking layer.
pub const DROPDOWN: &str = "cascade-dropdown";

/// Every menu panel.
pub const MENU: &str = "cascade-dropdown__menu";
/// A panel whose open transition should play.
pub const MENU_OPEN: &str = "cascade-dropdown__menu--open";
/// Prefix of the nesting depth class, e.g. `cascade-dropdown__menu--depth1`.
pub const MENU_DEPTH: &str = "cascade-dropdown__menu--depth";
/// A panel placed on the left of its anchor because it overflowed on the right.
pub const MENU_RIGHTWARDS: &str = "cascade-dropdown__menu--rightwards";
/// A panel placed above its anchor because it overflowed at the bottom.
pub const MENU_UPWARDS: &str = "cascade-dropdown__menu--upwards";

/// The element holding the rows of a panel.
pub const MENU_CONTAINER: &str = "cascade-dropdown__menu-container";
/// Every row, actions and sub-menu rows alike.
pub const ITEM: &str = "cascade-dropdown__menu-item";
/// A row expanding a sub-menu.
pub const SUB_ITEM: &str = "cascade-dropdown__sub-menu-item";
/// A sub-menu row whose panel is open.
pub const SUB_ITEM_OPENED: &str = "cascade-dropdown__sub-menu-item--opened";
/// A separator row.
pub const SEPARATOR: &str = "cascade-dropdown__separator";
/// The line inside the default separator.
pub const SEPARATOR_LINE: &str = "cascade-dropdown-separator__line";

/// A row that is not displayed.
pub const ITEM_HIDDEN: &str = "cascade-dropdown__menu-item--hidden";
/// A checked row.
pub const ITEM_CHECKED: &str = "cascade-dropdown__menu-item--checked";
/// A row that can't be executed.
pub const ITEM_DISABLED: &str = "cascade-dropdown__menu-item--disabled";
/// A row under the pointer or keyboard focus.
pub const ITEM_HOVERED: &str = "cascade-dropdown__menu-item--hovered";

/// Icon slot of the default row.
pub const ITEM_ICON: &str = "cascade-dropdown-menu-item__icon";
/// Label of the default row.
pub const ITEM_TEXT: &str = "cascade-dropdown-menu-item__text";
/// Sub-menu arrow of the default row.
pub const ITEM_ARROW: &str = "cascade-dropdown-menu-item__arrow";

/// Depth class for a panel nested `depth` levels deep.
pub fn menu_depth(depth: usize) -> String {
    format!("{MENU_DEPTH}{depth}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_class() {
        assert_eq!(menu_depth(0), "cascade-dropdown__menu--depth0");
        assert_eq!(menu_depth(12), "cascade-dropdown__menu--depth12");
    }
}
