// SPDX-License-Identifier: MIT OR Apache-2.0

//! Depth-first passes over a built panel tree.

use cascade_core::host::Host;
use kurbo::Rect;
use nalgebra::Vector2;

use super::menu::{MenuStore, PanelKey};
use super::position::place_sub_panel;

/// Visible status of a panel, derived from its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PanelStatus {
    /// At least one row is visible and enabled.
    Normal,
    /// Rows are visible but none is enabled.
    Disabled,
    /// No row is visible.
    Hidden,
}

/// A pass over the panel tree.
///
/// `enter` runs top-down and derives the state handed to the children,
/// `leave` runs bottom-up with the outputs of every child.
pub(crate) trait PanelVisitor<H: Host + 'static> {
    type State;
    type Output;

    fn enter(&mut self, store: &mut MenuStore<H>, host: &mut H, panel: PanelKey, state: &Self::State) -> Self::State;

    fn leave(
        &mut self,
        store: &mut MenuStore<H>,
        host: &mut H,
        panel: PanelKey,
        children: Vec<(PanelKey, Self::Output)>,
    ) -> Self::Output;
}

pub(crate) fn walk<H, V>(
    store: &mut MenuStore<H>,
    host: &mut H,
    visitor: &mut V,
    panel: PanelKey,
    state: &V::State,
) -> V::Output
where
    H: Host + 'static,
    V: PanelVisitor<H>,
{
    let state = visitor.enter(store, host, panel, state);

    let children: Vec<PanelKey> = store
        .panels
        .get(panel)
        .map(|menu| menu.sub_menus.values().copied().collect())
        .unwrap_or_default();

    let mut outputs = Vec::with_capacity(children.len());
    for child in children {
        let output = walk(store, host, visitor, child, &state);
        outputs.push((child, output));
    }

    visitor.leave(store, host, panel, outputs)
}

/// Propagates row status upwards: a sub-menu row is hidden when its panel
/// shows nothing, disabled when nothing in it is enabled.
pub(crate) struct StatusVisitor;

impl<H: Host + 'static> PanelVisitor<H> for StatusVisitor {
    type State = ();
    type Output = PanelStatus;

    fn enter(&mut self, _: &mut MenuStore<H>, _: &mut H, _: PanelKey, _: &()) {}

    fn leave(
        &mut self,
        store: &mut MenuStore<H>,
        host: &mut H,
        panel: PanelKey,
        children: Vec<(PanelKey, PanelStatus)>,
    ) -> PanelStatus {
        let mut visible = false;
        let mut enabled = false;

        if let Some(menu) = store.panels.get(panel) {
            for row in menu.action_items.iter().filter_map(|&key| store.action_items.get(key)) {
                if !row.hidden() {
                    visible = true;
                    enabled |= row.enabled();
                }
            }
        }

        for (child, status) in children {
            let Some(expander) = store.panels.get(child).and_then(|menu| menu.expander) else {
                continue;
            };
            let Some(row) = store.sub_items.get_mut(expander) else {
                continue;
            };

            match status {
                PanelStatus::Hidden => row.set_hidden(host, true),
                PanelStatus::Disabled => {
                    row.set_enabled(host, false);
                    visible = true;
                },
                PanelStatus::Normal => {
                    row.set_enabled(host, true);
                    visible = true;
                    enabled = true;
                },
            }
        }

        match (visible, enabled) {
            (false, _) => PanelStatus::Hidden,
            (true, false) => PanelStatus::Disabled,
            (true, true) => PanelStatus::Normal,
        }
    }
}

/// Places every sub-panel next to its row.
///
/// The state is the world position of the panel's border box once placed.
pub(crate) struct PlacementVisitor {
    pub root: PanelKey,
    pub bounds: Rect,
}

impl<H: Host + 'static> PanelVisitor<H> for PlacementVisitor {
    type State = Vector2<f64>;
    type Output = ();

    fn enter(
        &mut self,
        store: &mut MenuStore<H>,
        host: &mut H,
        panel: PanelKey,
        parent_origin: &Vector2<f64>,
    ) -> Vector2<f64> {
        if panel == self.root {
            return *parent_origin;
        }
        let Some(menu) = store.panels.get(panel) else {
            return *parent_origin;
        };
        let (Some(target), Some(parent)) = (menu.target, menu.parent.and_then(|parent| store.panels.get(parent))) else {
            return *parent_origin;
        };

        // the row relative to its panel, as currently laid out
        let current_parent = host.world_bound(parent.element).origin().to_vec2();
        let row = host.world_bound(target) - current_parent;
        let size = host.world_bound(menu.element).size();
        let margin = host.margins(menu.element);

        let placement = place_sub_panel(
            *parent_origin,
            row,
            Vector2::new(size.width, size.height),
            margin,
            self.bounds,
        );
        store.apply_placement(host, panel, placement);

        parent_origin + placement.position + Vector2::new(margin.x0, margin.y0)
    }

    fn leave(&mut self, _: &mut MenuStore<H>, _: &mut H, _: PanelKey, _: Vec<(PanelKey, ())>) {}
}

/// Detaches every panel from its parent, children first.
pub(crate) struct DetachVisitor;

impl<H: Host + 'static> PanelVisitor<H> for DetachVisitor {
    type State = ();
    type Output = ();

    fn enter(&mut self, _: &mut MenuStore<H>, _: &mut H, _: PanelKey, _: &()) {}

    fn leave(&mut self, store: &mut MenuStore<H>, host: &mut H, panel: PanelKey, _: Vec<(PanelKey, ())>) {
        if let Some(menu) = store.panels.get(panel) {
            host.remove_from_parent(menu.element);
        }
    }
}
