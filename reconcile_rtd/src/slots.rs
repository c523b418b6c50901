// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot descriptors, the host registry seam, and window-to-slot resolution.
//!
//! ## Overview
//!
//! Slot descriptors are owned by the host ad-serving SDK; this module reads
//! their identity fields and writes targeting entries, nothing more. The
//! [`SlotRegistry`] trait is the seam to the host's live slot list, with
//! [`HostSlots`] as the Vec-backed stand-in used by tests and demos.
//!
//! ## Resolution
//!
//! [`resolve_slot_by_window`] matches an iframe window back to the slot
//! whose rendered element contains it, comparing content windows by handle
//! identity only. URLs and frame names are attacker-controllable and are
//! never consulted.

use std::collections::BTreeMap;

use reconcile_frames::types::WindowGraph;

/// One registered ad placement, as seen through the host SDK.
///
/// The targeting map is the only field this crate mutates; it is keyed the
/// way ad servers key targeting (key to list of values).
#[derive(Clone, Debug)]
pub struct SlotDescriptor<E> {
    /// Ad-unit path, unique per registered slot.
    pub code: String,
    /// Identifier of the DOM element the slot renders into.
    pub div_id: String,
    /// Rendered DOM element, when the slot has one.
    pub element: Option<E>,
    targeting: BTreeMap<String, Vec<String>>,
}

impl<E> SlotDescriptor<E> {
    /// Describe a slot by its unit path, div id, and rendered element.
    pub fn new(code: impl Into<String>, div_id: impl Into<String>, element: Option<E>) -> Self {
        Self {
            code: code.into(),
            div_id: div_id.into(),
            element,
            targeting: BTreeMap::new(),
        }
    }

    /// Set a targeting key to a single value, replacing previous values.
    pub fn set_targeting(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.targeting.insert(key.into(), vec![value.into()]);
    }

    /// All values currently set for `key`.
    pub fn targeting(&self, key: &str) -> Option<&[String]> {
        self.targeting.get(key).map(Vec::as_slice)
    }

    /// First value set for `key`, the shape impression validation reads.
    pub fn targeting_value(&self, key: &str) -> Option<&str> {
        self.targeting
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Read/write view of the host SDK's currently registered slots.
///
/// The host owns descriptor lifecycle; implementations expose the live list
/// so the module can scan identities and stamp targeting entries.
pub trait SlotRegistry<E> {
    /// Currently registered slots, in registration order.
    fn slots(&self) -> &[SlotDescriptor<E>];

    /// Mutable view of the same list, for targeting writes.
    fn slots_mut(&mut self) -> &mut [SlotDescriptor<E>];
}

/// Vec-backed [`SlotRegistry`] standing in for the host SDK's slot list.
#[derive(Clone, Debug, Default)]
pub struct HostSlots<E> {
    slots: Vec<SlotDescriptor<E>>,
}

impl<E> HostSlots<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a slot.
    pub fn push(&mut self, slot: SlotDescriptor<E>) {
        self.slots.push(slot);
    }
}

impl<E> SlotRegistry<E> for HostSlots<E> {
    fn slots(&self) -> &[SlotDescriptor<E>] {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut [SlotDescriptor<E>] {
        &mut self.slots
    }
}

/// Find the first slot whose rendered element contains an iframe whose
/// content window is `win`.
///
/// Enumeration order is registration order; a window matching two slots is
/// not expected and resolves to the first found. No match is a normal
/// outcome (`None`), not an error.
pub fn resolve_slot_by_window<'a, G: WindowGraph>(
    graph: &G,
    slots: &'a [SlotDescriptor<G::Element>],
    win: G::Window,
) -> Option<&'a SlotDescriptor<G::Element>> {
    slots.iter().find(|slot| {
        let Some(element) = slot.element else {
            return false;
        };
        graph
            .iframes_under(element)
            .into_iter()
            .any(|frame| graph.content_window_of(frame) == Some(win))
    })
}
