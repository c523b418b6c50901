// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Targeting cycle basics.
//!
//! This minimal example registers two slots, runs one targeting cycle over
//! a mix of codes, div ids, and identifiers that resolve to nothing, then
//! prints the issued targeting and the single init announcement it caused.
//!
//! Run:
//! - `cargo run -p reconcile_demos --example targeting_cycle`

use reconcile_frames::graph::PageGraph;
use reconcile_rtd::{HostSlots, ModuleConfig, ReconciliationModule, SlotDescriptor};
use reconcile_track::recording::RecordingTransport;

fn main() {
    let mut page = PageGraph::new();
    let top = page.insert_window(None);

    // Two placements, each rendering an iframe into its own slot element.
    let banner_win = page.insert_window(Some(top));
    let banner_div = page.insert_element(None);
    page.insert_iframe(Some(banner_div), banner_win);

    let rail_win = page.insert_window(Some(top));
    let rail_div = page.insert_element(None);
    page.insert_iframe(Some(rail_div), rail_win);

    let mut slots = HostSlots::new();
    slots.push(SlotDescriptor::new("/site/banner", "banner-div", Some(banner_div)));
    slots.push(SlotDescriptor::new("/site/rail", "rail-div", Some(rail_div)));

    let config: ModuleConfig = serde_json::from_str(
        r#"{ "name": "reconciliation", "params": { "publisherMemberId": "demo-pub" } }"#,
    )
    .unwrap();

    let mut module = ReconciliationModule::new(page, slots, RecordingTransport::new());
    module.init(&config);

    // One id by code, one by div id, one unknown, one empty.
    let targeting = module.get_targeting_data(&["/site/banner", "rail-div", "/gone", ""]);

    println!("== Issued targeting ==");
    for (requested, entry) in &targeting {
        println!(
            "  {requested}  ->  RSDK_AUID={}  RSDK_ADID={}",
            entry.ad_unit_id, entry.ad_delivery_id
        );
    }

    println!("== Dispatched beacons ==");
    for call in module.transport().calls() {
        println!("  {call:?}");
    }
}
