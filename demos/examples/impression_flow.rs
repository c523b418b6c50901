// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end impression flow.
//!
//! A creative renders two iframes deep inside a slot, a targeting cycle
//! stamps the slot, and a cross-frame message from the innermost window is
//! walked back, validated, and forwarded as an impression beacon. A second
//! message from a stray window is dropped on the floor.
//!
//! Run:
//! - `cargo run -p reconcile_demos --example impression_flow`

use reconcile_frames::graph::PageGraph;
use reconcile_rtd::{HostSlots, ModuleConfig, ReconciliationModule, SlotDescriptor};
use reconcile_track::recording::RecordingTransport;

fn main() {
    let mut page = PageGraph::new();
    let top = page.insert_window(None);
    let ad_win = page.insert_window(Some(top));
    // The creative nests another iframe inside its own window.
    let inner_win = page.insert_window(Some(ad_win));

    let slot_div = page.insert_element(None);
    page.insert_iframe(Some(slot_div), ad_win);

    let mut slots = HostSlots::new();
    slots.push(SlotDescriptor::new("/site/banner", "banner-div", Some(slot_div)));

    let config: ModuleConfig = serde_json::from_str(
        r#"{ "name": "reconciliation", "params": { "publisherMemberId": "demo-pub" } }"#,
    )
    .unwrap();

    let mut module = ReconciliationModule::new(page, slots, RecordingTransport::new());
    module.init(&config);
    module.get_targeting_data(&["/site/banner"]);
    module.transport().take();

    let payload = r#"{
        "type": "rsdk:impression:req",
        "args": { "sourceMemberId": "member-9", "sourceImpressionId": "imp-42" }
    }"#;

    // Verified: the inner window walks up to the slot's iframe.
    module.on_message(Some(inner_win), payload);

    // Dropped: this window belongs to no registered slot.
    let stray = module.graph_mut().insert_window(Some(top));
    module.on_message(Some(stray), payload);

    println!("== Forwarded impressions ==");
    for call in module.transport().calls() {
        println!("  {call:?}");
    }
}
