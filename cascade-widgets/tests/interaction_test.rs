mod common;

use cascade_core::host::{Host, NavigationDirection, UiEvent};
use cascade_core::Update;
use cascade_widgets::blocking_layer::BlockingBehavior;
use cascade_widgets::dropdown::classnames::*;
use cascade_widgets::dropdown::{ActionStatus, DropdownMenu, MenuAction};
use common::Fixture;
use kurbo::Point;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn file_menu() -> DropdownMenu {
    DropdownMenu::new()
        .with_item(MenuAction::new("Open"))
        .with_item(MenuAction::new("Sub/Export"))
        .with_item(MenuAction::new("Sub/Import"))
}

#[test]
fn test_hover_opens_sub_menu_after_delay() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let root = fixture.dropdown.menu_at(&[]).unwrap();
    let sub_row = root.sub_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::PointerEnter);
    assert!(fixture.dropdown.item_info(sub_row).unwrap().activation_pending);
    assert_eq!(fixture.host.focused(), Some(sub_row));

    fixture.dropdown.advance(&mut fixture.host, 199);
    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu, None);
    assert!(fixture.host.has_class(root.element, MENU_OPEN));

    fixture.dropdown.advance(&mut fixture.host, 200);
    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu.as_deref(), Some("Sub"));
    assert!(fixture.host.has_class(sub_row, SUB_ITEM_OPENED));
    assert!(!fixture.dropdown.item_info(sub_row).unwrap().activation_pending);

    let sub = fixture.dropdown.menu_at(&["Sub"]).unwrap();
    assert_eq!(fixture.host.parent(sub.element), Some(root.element));
    assert!(!fixture.host.has_class(sub.element, MENU_OPEN));

    fixture.dropdown.advance(&mut fixture.host, 210);
    assert!(fixture.host.has_class(sub.element, MENU_OPEN));
}

#[test]
fn test_hovering_an_action_closes_the_open_sub_menu() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let root = fixture.dropdown.menu_at(&[]).unwrap();
    let sub_row = root.sub_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::PointerEnter);
    fixture.dropdown.advance(&mut fixture.host, 200);
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::PointerLeave);

    // leaving does not close the sub-menu
    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu.as_deref(), Some("Sub"));

    let open_row = root.action_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, open_row, UiEvent::PointerEnter);
    assert!(!fixture.host.has_class(sub_row, SUB_ITEM_OPENED));
    fixture.dropdown.advance(&mut fixture.host, 400);

    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu, None);
    let sub = fixture.dropdown.menu_at(&["Sub"]).unwrap();
    assert_eq!(fixture.host.parent(sub.element), None);
}

#[test]
fn test_pointer_leave_cancels_activation() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let sub_row = fixture.dropdown.menu_at(&[]).unwrap().sub_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::PointerEnter);
    assert!(fixture.host.has_class(sub_row, ITEM_HOVERED));
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::PointerLeave);

    assert!(!fixture.host.has_class(sub_row, ITEM_HOVERED));
    assert!(!fixture.dropdown.item_info(sub_row).unwrap().activation_pending);
    assert_eq!(fixture.host.focused(), None);
    fixture.dropdown.advance(&mut fixture.host, 1000);
    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu, None);
}

#[test]
fn test_close_cancels_activation() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let sub_row = fixture.dropdown.menu_at(&[]).unwrap().sub_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::PointerEnter);
    fixture.dropdown.close(&mut fixture.host);

    assert!(fixture.dropdown.item_info(sub_row).is_none());
    assert!(fixture.dropdown.advance(&mut fixture.host, 1000).is_empty());
    assert!(!fixture.host.has_class(sub_row, SUB_ITEM_OPENED));
    assert!(!fixture.host.has_class(sub_row, ITEM_HOVERED));
    assert_eq!(fixture.dropdown.pool_stats().menus.in_use, 0);
}

#[test]
fn test_disabled_rows_never_activate_or_execute() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let mut fixture = Fixture::new();
    let mut menu = DropdownMenu::new().with_item(
        MenuAction::new("Delete")
            .with_status(ActionStatus::DISABLED)
            .with_action(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Update::empty()
            }),
    );
    fixture.open(&mut menu);

    let row = fixture.dropdown.menu_at(&[]).unwrap().action_items[0];
    assert!(fixture.host.has_class(row, ITEM_DISABLED));

    fixture.dropdown.handle_event(&mut fixture.host, row, UiEvent::PointerEnter);
    assert!(!fixture.dropdown.item_info(row).unwrap().activation_pending);

    fixture.dropdown.handle_event(&mut fixture.host, row, UiEvent::PointerUp);
    fixture.dropdown.handle_event(&mut fixture.host, row, UiEvent::NavigationSubmit);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert!(fixture.dropdown.is_open(&fixture.host));
}

#[test]
fn test_executing_an_action_closes_then_runs_it() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let mut fixture = Fixture::new();
    let mut menu = DropdownMenu::new();
    menu.append_action("Save", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Update::DRAW
    });
    fixture.open(&mut menu);

    let row = fixture.dropdown.menu_at(&[]).unwrap().action_items[0];
    let update = fixture.dropdown.handle_event(&mut fixture.host, row, UiEvent::PointerUp);

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(update.contains(Update::EVAL | Update::DRAW));
    assert!(!fixture.dropdown.is_open(&fixture.host));
    assert_eq!(fixture.dropdown.pool_stats().action_items.in_use, 0);
}

#[test]
fn test_submit_on_sub_menu_row_focuses_first_row() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let sub_row = fixture.dropdown.menu_at(&[]).unwrap().sub_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::NavigationSubmit);

    let sub = fixture.dropdown.menu_at(&["Sub"]).unwrap();
    assert_eq!(fixture.host.focused(), Some(sub.action_items[0]));
    assert!(fixture.dropdown.is_open(&fixture.host));
}

#[test]
fn test_pointer_up_on_sub_menu_row_focuses_first_row() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let sub_row = fixture.dropdown.menu_at(&[]).unwrap().sub_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, sub_row, UiEvent::PointerUp);

    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu.as_deref(), Some("Sub"));
    let sub = fixture.dropdown.menu_at(&["Sub"]).unwrap();
    assert_eq!(fixture.host.focused(), Some(sub.action_items[0]));
    assert!(fixture.dropdown.is_open(&fixture.host));
}

#[test]
fn test_closing_a_sub_menu_clears_hovered_rows() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let root = fixture.dropdown.menu_at(&[]).unwrap();
    fixture.dropdown.handle_event(&mut fixture.host, root.sub_items[0], UiEvent::NavigationSubmit);
    let export = fixture.dropdown.menu_at(&["Sub"]).unwrap().action_items[0];
    fixture.dropdown.handle_event(&mut fixture.host, export, UiEvent::FocusIn);
    assert!(fixture.host.has_class(export, ITEM_HOVERED));

    fixture
        .dropdown
        .handle_event(&mut fixture.host, export, UiEvent::NavigationMove(NavigationDirection::Left));
    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu, None);
    assert!(!fixture.host.has_class(export, ITEM_HOVERED));
}

#[test]
fn test_keyboard_navigation() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);
    let layer = fixture.dropdown.layer_element();
    assert_eq!(fixture.host.focused(), Some(layer));

    let root = fixture.dropdown.menu_at(&[]).unwrap();
    let sub = fixture.dropdown.menu_at(&["Sub"]).unwrap();
    let move_focus = |fixture: &mut Fixture, direction| {
        let target = fixture.host.focused().unwrap();
        fixture
            .dropdown
            .handle_event(&mut fixture.host, target, UiEvent::NavigationMove(direction));
        fixture.host.focused()
    };

    assert_eq!(move_focus(&mut fixture, NavigationDirection::Down), Some(root.action_items[0]));
    assert_eq!(move_focus(&mut fixture, NavigationDirection::Down), Some(root.sub_items[0]));

    assert_eq!(move_focus(&mut fixture, NavigationDirection::Right), Some(sub.action_items[0]));
    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu.as_deref(), Some("Sub"));

    assert_eq!(move_focus(&mut fixture, NavigationDirection::Down), Some(sub.action_items[1]));
    assert_eq!(move_focus(&mut fixture, NavigationDirection::Down), Some(sub.action_items[0]));

    assert_eq!(move_focus(&mut fixture, NavigationDirection::Left), Some(root.sub_items[0]));
    assert_eq!(fixture.dropdown.menu_at(&[]).unwrap().open_sub_menu, None);
    assert_eq!(fixture.host.parent(sub.element), None);

    // wraps around
    assert_eq!(move_focus(&mut fixture, NavigationDirection::Next), Some(root.action_items[0]));
    assert_eq!(move_focus(&mut fixture, NavigationDirection::Previous), Some(root.sub_items[0]));
}

#[test]
fn test_hidden_rows_are_skipped_by_navigation() {
    let mut fixture = Fixture::new();
    let mut menu = DropdownMenu::new()
        .with_item(MenuAction::new("One"))
        .with_item(MenuAction::new("Two").with_status(ActionStatus::HIDDEN))
        .with_item(MenuAction::new("Three"));
    fixture.open(&mut menu);

    let rows = fixture.dropdown.menu_at(&[]).unwrap().action_items;
    let hidden = rows[1];
    assert!(!fixture.host.is_focusable(hidden));
    assert!(!fixture.host.is_displayed(hidden));
    assert!(fixture.dropdown.item_info(hidden).unwrap().hidden);
    assert_eq!(fixture.dropdown.pool_stats().action_items.in_use, 3);

    fixture.host.focus(rows[0]);
    let down = UiEvent::NavigationMove(NavigationDirection::Down);
    fixture.dropdown.handle_event(&mut fixture.host, rows[0], down);
    assert_eq!(fixture.host.focused(), Some(rows[2]));
    fixture.dropdown.handle_event(&mut fixture.host, rows[2], down);
    assert_eq!(fixture.host.focused(), Some(rows[0]));

    let up = UiEvent::NavigationMove(NavigationDirection::Up);
    fixture.dropdown.handle_event(&mut fixture.host, rows[0], up);
    assert_eq!(fixture.host.focused(), Some(rows[2]));
}

#[test]
fn test_click_outside_closes_and_redispatches() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let layer = fixture.dropdown.layer_element();
    let click = UiEvent::PointerDown {
        position: Point::new(80.0, 15.0),
    };
    fixture.dropdown.handle_event(&mut fixture.host, layer, click);

    assert!(!fixture.dropdown.is_open(&fixture.host));
    assert_eq!(fixture.host.redispatched(), &[(fixture.button, click)]);
    assert_eq!(fixture.host.children(fixture.window), &[fixture.button]);
}

#[test]
fn test_cancel_closes_unless_disabled() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    let row = fixture.dropdown.menu_at(&[]).unwrap().action_items[0];
    fixture
        .dropdown
        .set_blocking_behavior(&mut fixture.host, BlockingBehavior::CLOSE_ON_CLICK);
    fixture.dropdown.handle_event(&mut fixture.host, row, UiEvent::NavigationCancel);
    assert!(fixture.dropdown.is_open(&fixture.host));

    fixture
        .dropdown
        .set_blocking_behavior(&mut fixture.host, BlockingBehavior::CLOSEABLE);
    fixture.dropdown.handle_event(&mut fixture.host, row, UiEvent::NavigationCancel);
    assert!(!fixture.dropdown.is_open(&fixture.host));
}

#[test]
fn test_focus_stays_inside_the_dropdown() {
    let mut fixture = Fixture::new();
    let mut menu = file_menu();
    fixture.open(&mut menu);

    fixture.host.focus(fixture.button);
    fixture.dropdown.handle_event(&mut fixture.host, fixture.button, UiEvent::FocusIn);
    assert_eq!(fixture.host.focused(), Some(fixture.dropdown.layer_element()));
    assert!(fixture.dropdown.is_open(&fixture.host));
}

#[test]
fn test_events_are_ignored_while_closed() {
    let mut fixture = Fixture::new();
    let layer = fixture.dropdown.layer_element();
    let update = fixture
        .dropdown
        .handle_event(&mut fixture.host, layer, UiEvent::NavigationCancel);

    assert!(update.is_empty());
    assert!(fixture.host.redispatched().is_empty());
}
