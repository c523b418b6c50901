// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconcile Frames: window hierarchy capabilities for frame correlation.
//!
//! ## Overview
//!
//! A page that embeds ad creatives sees a graph of browsing contexts:
//! windows linked by parent/top references, and DOM elements, some of which
//! are iframes holding a content window. Walking that graph is the hard part
//! of impression reconciliation — parent links can be broken, any hop can be
//! denied by cross-origin rules, and nothing about it is trustworthy except
//! reference identity.
//!
//! This crate abstracts the graph behind the [`WindowGraph`](crate::types::WindowGraph)
//! capability trait so the walker (and slot resolution built on top of it)
//! runs identically against a real browser bridge or the in-tree simulation:
//!
//! - [`types`]: generational [`WindowId`](crate::types::WindowId) /
//!   [`ElementId`](crate::types::ElementId) handles, the
//!   [`AccessError`](crate::types::AccessError) cross-origin denial, and the
//!   [`WindowGraph`](crate::types::WindowGraph) trait.
//! - [`graph`]: [`PageGraph`](crate::graph::PageGraph), a simulated page with
//!   breakable parent links and per-window cross-origin denial.
//! - [`walk`]: [`find_top_iframe_window`](crate::walk::find_top_iframe_window),
//!   which climbs to the iframe window one level below the page's top.
//!
//! ## Failure posture
//!
//! Every interop failure degrades to "no result". The walker never
//! propagates an error and never returns a partial chain: a broken or denied
//! hop anywhere invalidates the whole walk.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod graph;
pub mod types;
pub mod walk;
