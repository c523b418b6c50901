// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles, the cross-origin error, and the window graph capability trait.

use alloc::vec::Vec;

/// Identifier for a browsing context (window) in a page graph.
///
/// This is a small, copyable handle that stays stable across updates but
/// becomes invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `WindowId` that pointed to
///   that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `WindowId`.
///
/// Stale handles never alias a different live window because the generation
/// must match. Identity comparison of handles is the only trusted way to
/// match windows: names, URLs, and origins are attacker-controllable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WindowId(pub(crate) u32, pub(crate) u32);

impl WindowId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Identifier for a DOM element in a page graph.
///
/// Same slot/generation semantics as [`WindowId`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Cross-origin access denial raised by window graph capabilities.
///
/// The browser throws when a script touches `parent`/`top` internals across
/// an origin boundary; graph implementations surface that as this error.
/// Consumers convert it into an empty result — it never crosses the public
/// boundary of the reconciliation module.
#[derive(thiserror::Error, Copy, Clone, Debug, Eq, PartialEq)]
#[error("cross-origin window access denied")]
pub struct AccessError;

/// Ambient window/element graph capability.
///
/// Minimal surface needed by the walker and the slot resolver: parent and
/// top hops (both fallible, since the browser can deny them), iframe
/// enumeration under an element, and the iframe-to-content-window link.
/// Implementable against a real browser bridge or the simulated
/// [`PageGraph`](crate::graph::PageGraph).
pub trait WindowGraph {
    /// Window handle type. Compared by identity only.
    type Window: Copy + Eq;
    /// Element handle type. Compared by identity only.
    type Element: Copy + Eq;

    /// Parent window of `win`.
    ///
    /// `Ok(None)` for a root, a detached window, or a stale handle;
    /// `Err` when cross-origin rules deny the access.
    fn parent_of(&self, win: Self::Window) -> Result<Option<Self::Window>, AccessError>;

    /// Top window of `win`'s browsing context tree.
    ///
    /// `Ok(None)` for a stale handle; `Err` when access is denied.
    fn top_of(&self, win: Self::Window) -> Result<Option<Self::Window>, AccessError>;

    /// Iframe elements nested anywhere under `element`, in document order.
    ///
    /// The element itself is not included.
    fn iframes_under(&self, element: Self::Element) -> Vec<Self::Element>;

    /// Content window of an iframe element, if it has one.
    fn content_window_of(&self, iframe: Self::Element) -> Option<Self::Window>;
}
