// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window hierarchy walker: find the iframe window directly under top.
//!
//! ## Overview
//!
//! An ad creative can run arbitrarily deep in a stack of nested iframes.
//! What identifies its placement on the page is not the posting window but
//! the outermost iframe in its chain — the window whose parent is the page's
//! absolute top. [`find_top_iframe_window`] climbs the parent chain to find
//! it.
//!
//! ## Failure posture
//!
//! The walk is all-or-nothing. A missing start window, a broken parent link
//! anywhere in the chain, or a cross-origin denial on any hop yields `None`;
//! there is no best-effort partial result, because a partial chain would
//! attribute the impression to the wrong placement.

use crate::types::WindowGraph;

/// Climb the parent chain from `start` to the iframe window one level below
/// the page's top window.
///
/// Returns `None` when `start` is `None`, when any hop's parent reference is
/// unset before reaching top, or when any parent/top access is denied.
/// Passing the top window itself returns it unchanged if the graph reports
/// the browser's self-parent convention for top.
pub fn find_top_iframe_window<G: WindowGraph>(
    graph: &G,
    start: Option<G::Window>,
) -> Option<G::Window> {
    let mut win = start?;
    let top = graph.top_of(win).ok().flatten()?;
    loop {
        match graph.parent_of(win) {
            Ok(Some(parent)) if parent == top => return Some(win),
            // A self-parented hop below top cannot make progress.
            Ok(Some(parent)) if parent == win => return None,
            Ok(Some(parent)) => win = parent,
            Ok(None) | Err(_) => return None,
        }
    }
}
