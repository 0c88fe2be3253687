// SPDX-License-Identifier: MIT OR Apache-2.0

//! An in-memory [Host] for tests and tooling.
//!
//! Geometry comes from a tiny stylesheet of class rules plus a column flow:
//! flow children stack top to bottom, an element without an explicit size
//! takes the widest flow child and the sum of their heights, text measures as
//! `len * char_width` by `line_height`. Absolute children (positioned,
//! stretched, or styled absolute) are placed at their offset and don't count
//! towards the parent's size. This is nowhere near a real layout engine.

use crate::host::{ElementId, Host, PickingMode, UiEvent};
use kurbo::{Insets, Point, Rect, Size, Vec2};
use std::collections::HashMap;

/// Style applied to every element carrying a class.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassRule {
    /// Fixed size.
    pub size: Option<Size>,
    /// Margins around the element.
    pub margins: Option<Insets>,
    /// Take the element out of the flow.
    pub absolute: bool,
    /// Hide the element and remove it from the flow.
    pub display_none: bool,
}

impl ClassRule {
    /// A rule that only sets a size.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            size: Some(Size::new(width, height)),
            ..Default::default()
        }
    }

    /// A rule that takes elements out of the flow.
    pub fn absolute() -> Self {
        Self {
            absolute: true,
            ..Default::default()
        }
    }

    /// A rule that hides elements.
    pub fn hidden() -> Self {
        Self {
            display_none: true,
            ..Default::default()
        }
    }

    /// Set the margins.
    pub fn with_margins(mut self, margins: Insets) -> Self {
        self.margins = Some(margins);
        self
    }
}

#[derive(Debug, Default)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    name: Option<String>,
    text: Option<String>,
    focusable: bool,
    picking: PickingMode,
    stretch: bool,
    position: Option<Point>,
    size: Option<Size>,
}

/// In-memory retained element tree.
#[derive(Debug)]
pub struct HeadlessHost {
    nodes: Vec<Node>,
    roots: Vec<ElementId>,
    stylesheet: HashMap<String, ClassRule>,
    focused: Option<ElementId>,
    char_width: f64,
    line_height: f64,
    redispatched: Vec<(ElementId, UiEvent)>,
}

impl HeadlessHost {
    /// Create an empty host with 8px wide characters and 20px lines.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            stylesheet: HashMap::new(),
            focused: None,
            char_width: 8.0,
            line_height: 20.0,
            redispatched: Vec::new(),
        }
    }

    /// Set the text metrics.
    pub fn with_text_metrics(mut self, char_width: f64, line_height: f64) -> Self {
        self.char_width = char_width;
        self.line_height = line_height;
        self
    }

    /// Add or replace the rule for a class.
    pub fn style(&mut self, class: impl Into<String>, rule: ClassRule) {
        self.stylesheet.insert(class.into(), rule);
    }

    /// Create a window root of the given size at the world origin.
    pub fn create_root(&mut self, width: f64, height: f64) -> ElementId {
        let root = self.create_element();
        self.set_size(root, Size::new(width, height));
        self.roots.push(root);
        root
    }

    /// Give an element a fixed size.
    pub fn set_size(&mut self, id: ElementId, size: Size) {
        if let Some(node) = self.node_mut(id) {
            node.size = Some(size);
        }
    }

    /// Get the text content of an element.
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.node(id).and_then(|node| node.text.as_deref())
    }

    /// Get the classes of an element.
    pub fn classes(&self, id: ElementId) -> Vec<&str> {
        self.node(id)
            .map(|node| node.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Get the absolute position set on an element.
    pub fn position(&self, id: ElementId) -> Option<Point> {
        self.node(id).and_then(|node| node.position)
    }

    /// Check whether an element is reachable from a window root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.roots.iter().any(|&root| self.is_within(id, root))
    }

    /// Check whether an element is attached and not hidden by the stylesheet.
    pub fn is_displayed(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(element) = current {
            if self.rule(element).display_none {
                return false;
            }
            current = self.parent(element);
        }
        self.is_attached(id)
    }

    /// Events passed to [Host::redispatch] so far.
    pub fn redispatched(&self) -> &[(ElementId, UiEvent)] {
        &self.redispatched
    }

    /// Number of elements ever created.
    pub fn element_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn rule(&self, id: ElementId) -> ClassRule {
        let mut merged = ClassRule::default();
        let Some(node) = self.node(id) else {
            return merged;
        };
        for class in &node.classes {
            if let Some(rule) = self.stylesheet.get(class) {
                if rule.size.is_some() {
                    merged.size = rule.size;
                }
                if rule.margins.is_some() {
                    merged.margins = rule.margins;
                }
                merged.absolute |= rule.absolute;
                merged.display_none |= rule.display_none;
            }
        }
        merged
    }

    fn in_flow(&self, id: ElementId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let rule = self.rule(id);
        !(rule.display_none || rule.absolute || node.stretch || node.position.is_some())
    }

    fn size(&self, id: ElementId) -> Size {
        let Some(node) = self.node(id) else {
            return Size::ZERO;
        };
        let rule = self.rule(id);
        if rule.display_none {
            return Size::ZERO;
        }
        if node.stretch {
            return node.parent.map(|parent| self.size(parent)).unwrap_or(Size::ZERO);
        }
        if let Some(size) = node.size.or(rule.size) {
            return size;
        }

        let mut content = match &node.text {
            Some(text) => Size::new(text.chars().count() as f64 * self.char_width, self.line_height),
            None => Size::ZERO,
        };
        let mut flow_height = 0.0;
        for &child in node.children.iter().filter(|&&child| self.in_flow(child)) {
            let margins = self.margins(child);
            let child_size = self.size(child);
            content.width = content.width.max(child_size.width + margins.x_value());
            flow_height += child_size.height + margins.y_value();
        }
        content.height = content.height.max(flow_height);
        content
    }

    fn local_origin(&self, id: ElementId) -> Vec2 {
        let Some(node) = self.node(id) else {
            return Vec2::ZERO;
        };
        if node.stretch {
            return Vec2::ZERO;
        }

        let margins = self.margins(id);
        let offset = Vec2::new(margins.x0, margins.y0);
        let Some(parent) = node.parent else {
            return node.position.unwrap_or(Point::ORIGIN).to_vec2() + offset;
        };
        if !self.in_flow(id) {
            return node.position.unwrap_or(Point::ORIGIN).to_vec2() + offset;
        }

        let mut y = 0.0;
        for &sibling in self.children(parent) {
            if sibling == id {
                break;
            }
            if self.in_flow(sibling) {
                y += self.size(sibling).height + self.margins(sibling).y_value();
            }
        }
        Vec2::new(offset.x, y + offset.y)
    }

    fn world_origin(&self, id: ElementId) -> Point {
        let local = self.local_origin(id);
        match self.parent(id) {
            Some(parent) => self.world_origin(parent) + local,
            None => Point::ORIGIN + local,
        }
    }

    fn pick_in(&self, id: ElementId, point: Point) -> Option<ElementId> {
        let node = self.node(id)?;
        if self.rule(id).display_none {
            return None;
        }
        for &child in node.children.iter().rev() {
            if let Some(found) = self.pick_in(child, point) {
                return Some(found);
            }
        }
        if node.picking == PickingMode::Position && self.world_bound(id).contains(point) {
            Some(id)
        } else {
            None
        }
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.node(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for HeadlessHost {
    fn create_element(&mut self) -> ElementId {
        let id = ElementId(self.nodes.len() as u64);
        self.nodes.push(Node::default());
        id
    }

    fn contains(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|node| node.parent)
    }

    fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    fn add_child(&mut self, parent: ElementId, child: ElementId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    fn insert_child(&mut self, parent: ElementId, index: usize, child: ElementId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(parent_node) = self.node_mut(parent) {
            let index = index.min(parent_node.children.len());
            parent_node.children.insert(index, child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn remove_from_parent(&mut self, id: ElementId) {
        self.detach(id);
    }

    fn clear_children(&mut self, id: ElementId) {
        let children = self
            .node_mut(id)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }
    }

    fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            if !node.classes.iter().any(|existing| existing == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.node_mut(id) {
            node.classes.retain(|existing| existing != class);
        }
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.node(id)
            .is_some_and(|node| node.classes.iter().any(|existing| existing == class))
    }

    fn clear_classes(&mut self, id: ElementId) {
        if let Some(node) = self.node_mut(id) {
            node.classes.clear();
        }
    }

    fn set_name(&mut self, id: ElementId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.name = Some(name.to_string());
        }
    }

    fn name(&self, id: ElementId) -> Option<&str> {
        self.node(id).and_then(|node| node.name.as_deref())
    }

    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.to_string());
        }
    }

    fn set_focusable(&mut self, id: ElementId, focusable: bool) {
        if let Some(node) = self.node_mut(id) {
            node.focusable = focusable;
        }
    }

    fn is_focusable(&self, id: ElementId) -> bool {
        self.node(id).is_some_and(|node| node.focusable)
    }

    fn set_picking(&mut self, id: ElementId, mode: PickingMode) {
        if let Some(node) = self.node_mut(id) {
            node.picking = mode;
        }
    }

    fn picking(&self, id: ElementId) -> PickingMode {
        self.node(id).map(|node| node.picking).unwrap_or_default()
    }

    fn set_stretch_to_parent(&mut self, id: ElementId) {
        if let Some(node) = self.node_mut(id) {
            node.stretch = true;
        }
    }

    fn set_position(&mut self, id: ElementId, position: Option<Point>) {
        if let Some(node) = self.node_mut(id) {
            node.position = position;
        }
    }

    fn world_bound(&self, id: ElementId) -> Rect {
        Rect::from_origin_size(self.world_origin(id), self.size(id))
    }

    fn local_bound(&self, id: ElementId) -> Rect {
        Rect::from_origin_size(self.local_origin(id).to_point(), self.size(id))
    }

    fn margins(&self, id: ElementId) -> Insets {
        self.rule(id).margins.unwrap_or(Insets::ZERO)
    }

    fn world_to_local(&self, id: ElementId, point: Point) -> Point {
        point - self.world_origin(id).to_vec2()
    }

    fn pick(&self, point: Point) -> Option<ElementId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.pick_in(root, point))
    }

    fn focus(&mut self, id: ElementId) {
        if self.is_focusable(id) {
            self.focused = Some(id);
        }
    }

    fn blur(&mut self, id: ElementId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    fn redispatch(&mut self, target: ElementId, event: UiEvent) {
        self.redispatched.push((target, event));
    }
}
