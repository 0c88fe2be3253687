// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree order and focus traversal helpers.

use crate::host::{ElementId, Host};
use std::cmp::Ordering;

/// Get the relative order of two elements in the host tree.
///
/// - `Some(Ordering::Less)`: `a` is below `b` (an ancestor of `b`, or in an earlier branch).
/// - `Some(Ordering::Greater)`: `a` is above `b` (a descendant of `b`, or in a later branch).
/// - `None`: both are the same element or they don't share a tree.
pub fn relative_order<H: Host + ?Sized>(host: &H, a: ElementId, b: ElementId) -> Option<Ordering> {
    if a == b {
        return None;
    }

    let common = common_ancestor(host, a, b)?;
    if common == a {
        return Some(Ordering::Less);
    }
    if common == b {
        return Some(Ordering::Greater);
    }

    let branch_a = child_towards(host, common, a)?;
    let branch_b = child_towards(host, common, b)?;
    let index_a = host.index_in_parent(branch_a)?;
    let index_b = host.index_in_parent(branch_b)?;

    Some(if index_a < index_b {
        Ordering::Less
    } else {
        Ordering::Greater
    })
}

/// Check whether `a` is drawn above `b`, i.e. would receive input first.
pub fn is_above<H: Host + ?Sized>(host: &H, a: ElementId, b: ElementId) -> bool {
    relative_order(host, a, b) == Some(Ordering::Greater)
}

fn common_ancestor<H: Host + ?Sized>(host: &H, a: ElementId, b: ElementId) -> Option<ElementId> {
    let mut ancestors = Vec::new();
    let mut current = Some(a);
    while let Some(element) = current {
        ancestors.push(element);
        current = host.parent(element);
    }

    let mut current = Some(b);
    while let Some(element) = current {
        if ancestors.contains(&element) {
            return Some(element);
        }
        current = host.parent(element);
    }
    None
}

/// The direct child of `ancestor` on the path down to `descendant`.
fn child_towards<H: Host + ?Sized>(
    host: &H,
    ancestor: ElementId,
    descendant: ElementId,
) -> Option<ElementId> {
    let mut current = descendant;
    loop {
        let parent = host.parent(current)?;
        if parent == ancestor {
            return Some(current);
        }
        current = parent;
    }
}

/// Find the closest focusable sibling before `element`, wrapping around.
///
/// Returns `element` itself when no other sibling is focusable.
pub fn find_previous_focusable_sibling<H: Host + ?Sized>(host: &H, element: ElementId) -> ElementId {
    let Some(parent) = host.parent(element) else {
        return element;
    };
    let siblings = host.children(parent);
    let Some(index) = siblings.iter().position(|&child| child == element) else {
        return element;
    };

    let count = siblings.len();
    let mut prev = (count + index - 1) % count;
    while prev != index {
        if host.is_focusable(siblings[prev]) {
            return siblings[prev];
        }
        prev = (count + prev - 1) % count;
    }
    element
}

/// Find the closest focusable sibling after `element`, wrapping around.
///
/// Returns `element` itself when no other sibling is focusable.
pub fn find_next_focusable_sibling<H: Host + ?Sized>(host: &H, element: ElementId) -> ElementId {
    let Some(parent) = host.parent(element) else {
        return element;
    };
    let siblings = host.children(parent);
    let Some(index) = siblings.iter().position(|&child| child == element) else {
        return element;
    };

    let count = siblings.len();
    let mut next = (index + 1) % count;
    while next != index {
        if host.is_focusable(siblings[next]) {
            return siblings[next];
        }
        next = (next + 1) % count;
    }
    element
}

/// Find the first focusable direct child.
pub fn find_first_focusable_child<H: Host + ?Sized>(host: &H, element: ElementId) -> Option<ElementId> {
    host.children(element)
        .iter()
        .copied()
        .find(|&child| host.is_focusable(child))
}

/// Find the last focusable direct child.
pub fn find_last_focusable_child<H: Host + ?Sized>(host: &H, element: ElementId) -> Option<ElementId> {
    host.children(element)
        .iter()
        .rev()
        .copied()
        .find(|&child| host.is_focusable(child))
}

/// Find the first focusable descendant, depth first.
pub fn find_first_focusable_child_recursive<H: Host + ?Sized>(
    host: &H,
    element: ElementId,
) -> Option<ElementId> {
    for &child in host.children(element) {
        if host.is_focusable(child) {
            return Some(child);
        }
        if let Some(nested) = find_first_focusable_child_recursive(host, child) {
            return Some(nested);
        }
    }
    None
}
