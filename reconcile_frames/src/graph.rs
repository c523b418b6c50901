// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated page graph: windows with parent/top links, elements with
//! iframe content windows.
//!
//! ## Overview
//!
//! [`PageGraph`] stands in for the browser's ambient window graph in tests
//! and demos. It models the failure shapes the walker has to survive:
//! a parent link that is simply gone ([`PageGraph::break_parent_link`]) and
//! a window whose parent/top accessors are denied by cross-origin rules
//! ([`PageGraph::set_cross_origin`]).
//!
//! Handles are generational (slot index + generation); removing a window or
//! element makes outstanding handles stale, and stale handles resolve to
//! nothing rather than aliasing a reused slot.

use alloc::vec::Vec;

use crate::types::{AccessError, ElementId, WindowGraph, WindowId};

#[derive(Clone, Debug)]
struct WindowNode {
    generation: u32,
    /// `None` models a broken/unset parent reference, not just a root.
    parent: Option<WindowId>,
    /// Top of this window's browsing context tree; self for roots.
    top: WindowId,
    /// When set, parent/top accesses on this window are denied.
    cross_origin: bool,
}

#[derive(Clone, Debug)]
struct ElementNode {
    generation: u32,
    children: Vec<ElementId>,
    /// `Some` marks this element as an iframe holding that content window.
    content_window: Option<WindowId>,
}

/// Simulated page: a forest of windows plus a forest of elements.
#[derive(Clone, Default)]
pub struct PageGraph {
    windows: Vec<Option<WindowNode>>,
    window_generations: Vec<u32>,
    window_free: Vec<usize>,
    elements: Vec<Option<ElementNode>>,
    element_generations: Vec<u32>,
    element_free: Vec<usize>,
}

impl core::fmt::Debug for PageGraph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let windows_alive = self.windows.iter().filter(|w| w.is_some()).count();
        let elements_alive = self.elements.iter().filter(|e| e.is_some()).count();
        f.debug_struct("PageGraph")
            .field("windows_total", &self.windows.len())
            .field("windows_alive", &windows_alive)
            .field("elements_total", &self.elements.len())
            .field("elements_alive", &elements_alive)
            .finish_non_exhaustive()
    }
}

impl PageGraph {
    /// Create an empty page graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a window under `parent`, or a new top-level window if `None`.
    ///
    /// The top link is inherited from the parent; a top-level window is its
    /// own top.
    pub fn insert_window(&mut self, parent: Option<WindowId>) -> WindowId {
        let (idx, generation) = if let Some(idx) = self.window_free.pop() {
            let generation = self.window_generations[idx].saturating_add(1);
            self.window_generations[idx] = generation;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "handles use 32-bit indices by design"
            )]
            (idx as u32, generation)
        } else {
            self.window_generations.push(1);
            self.windows.push(None);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "handles use 32-bit indices by design"
            )]
            ((self.windows.len() - 1) as u32, 1_u32)
        };
        let id = WindowId::new(idx, generation);
        let top = parent
            .and_then(|p| self.window(p))
            .map(|p| p.top)
            .unwrap_or(id);
        self.windows[id.idx()] = Some(WindowNode {
            generation,
            parent,
            top,
            cross_origin: false,
        });
        id
    }

    /// Remove a window; outstanding handles to it become stale.
    pub fn remove_window(&mut self, id: WindowId) {
        if self.window(id).is_none() {
            return;
        }
        self.windows[id.idx()] = None;
        self.window_free.push(id.idx());
    }

    /// Sever `win`'s parent reference, leaving its top link intact.
    ///
    /// Models a teardown race where an intermediate frame navigated away.
    pub fn break_parent_link(&mut self, win: WindowId) {
        if let Some(node) = self.window_mut(win) {
            node.parent = None;
        }
    }

    /// Mark `win` as cross-origin: parent/top accesses on it are denied.
    pub fn set_cross_origin(&mut self, win: WindowId, denied: bool) {
        if let Some(node) = self.window_mut(win) {
            node.cross_origin = denied;
        }
    }

    /// True if `id` refers to a live window.
    pub fn is_window_alive(&self, id: WindowId) -> bool {
        self.window(id).is_some()
    }

    /// Insert a plain element under `parent`, or as a root if `None`.
    pub fn insert_element(&mut self, parent: Option<ElementId>) -> ElementId {
        self.insert_element_node(parent, None)
    }

    /// Insert an iframe element under `parent`, holding `content`.
    pub fn insert_iframe(&mut self, parent: Option<ElementId>, content: WindowId) -> ElementId {
        self.insert_element_node(parent, Some(content))
    }

    /// Remove an element and its subtree; handles into it become stale.
    pub fn remove_element(&mut self, id: ElementId) {
        let Some(node) = self.element(id) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.remove_element(child);
        }
        self.elements[id.idx()] = None;
        self.element_free.push(id.idx());
    }

    /// True if `id` refers to a live element.
    pub fn is_element_alive(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    // --- internals ---

    fn insert_element_node(
        &mut self,
        parent: Option<ElementId>,
        content_window: Option<WindowId>,
    ) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.element_free.pop() {
            let generation = self.element_generations[idx].saturating_add(1);
            self.element_generations[idx] = generation;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "handles use 32-bit indices by design"
            )]
            (idx as u32, generation)
        } else {
            self.element_generations.push(1);
            self.elements.push(None);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "handles use 32-bit indices by design"
            )]
            ((self.elements.len() - 1) as u32, 1_u32)
        };
        let id = ElementId::new(idx, generation);
        self.elements[id.idx()] = Some(ElementNode {
            generation,
            children: Vec::new(),
            content_window,
        });
        if let Some(p) = parent
            && let Some(parent_node) = self.element_mut(p)
        {
            parent_node.children.push(id);
        }
        id
    }

    fn window(&self, id: WindowId) -> Option<&WindowNode> {
        self.windows
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.generation())
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowNode> {
        self.windows
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.generation())
    }

    fn element(&self, id: ElementId) -> Option<&ElementNode> {
        self.elements
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.generation())
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut ElementNode> {
        self.elements
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.generation())
    }

    fn collect_iframes(&self, id: ElementId, out: &mut Vec<ElementId>) {
        let Some(node) = self.element(id) else {
            return;
        };
        for &child in &node.children {
            if let Some(child_node) = self.element(child) {
                if child_node.content_window.is_some() {
                    out.push(child);
                }
                self.collect_iframes(child, out);
            }
        }
    }
}

impl WindowGraph for PageGraph {
    type Window = WindowId;
    type Element = ElementId;

    fn parent_of(&self, win: WindowId) -> Result<Option<WindowId>, AccessError> {
        let Some(node) = self.window(win) else {
            return Ok(None);
        };
        if node.cross_origin {
            return Err(AccessError);
        }
        Ok(node.parent)
    }

    fn top_of(&self, win: WindowId) -> Result<Option<WindowId>, AccessError> {
        let Some(node) = self.window(win) else {
            return Ok(None);
        };
        if node.cross_origin {
            return Err(AccessError);
        }
        Ok(Some(node.top))
    }

    fn iframes_under(&self, element: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_iframes(element, &mut out);
        out
    }

    fn content_window_of(&self, iframe: ElementId) -> Option<WindowId> {
        self.element(iframe)?.content_window
    }
}
