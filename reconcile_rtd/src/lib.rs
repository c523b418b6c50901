// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconcile RTD: the impression reconciliation module.
//!
//! ## Overview
//!
//! A publisher page renders ad placements into registered slots; a
//! third-party creative inside one of those slots later announces that it
//! was displayed. This crate correlates the two sides:
//!
//! 1. Per targeting cycle, [`ReconciliationModule::get_targeting_data`]
//!    resolves requested ad-unit identifiers to slots, stamps each slot
//!    with a fresh delivery id (`RSDK_ADID`) and its unit path
//!    (`RSDK_AUID`), and announces the batch to the confirmation endpoint.
//! 2. At any later time, [`ReconciliationModule::on_message`] receives an
//!    untrusted cross-frame message, walks the window hierarchy back to the
//!    placement iframe, matches it to a slot, reads the stamped targeting
//!    back, and forwards a verified impression beacon.
//!
//! ## Failure posture
//!
//! Nothing here throws across the public boundary. Unresolvable
//! identifiers, unmatched windows, malformed messages, and unstamped slots
//! all degrade to "no entry" or "no beacon" — a publisher page must never
//! break because of this module. The only logged failure is a missing
//! `publisherMemberId` at init, which is a configuration error but does not
//! deactivate the module.
//!
//! ## Workflow
//!
//! ```
//! use reconcile_frames::graph::PageGraph;
//! use reconcile_rtd::{HostSlots, ModuleConfig, ReconciliationModule, SlotDescriptor};
//! use reconcile_track::recording::RecordingTransport;
//!
//! let mut page = PageGraph::new();
//! let top = page.insert_window(None);
//! let ad_win = page.insert_window(Some(top));
//! let slot_div = page.insert_element(None);
//! page.insert_iframe(Some(slot_div), ad_win);
//!
//! let mut slots = HostSlots::new();
//! slots.push(SlotDescriptor::new("/ad/unit", "ad-div", Some(slot_div)));
//!
//! let config: ModuleConfig = serde_json::from_str(
//!     r#"{ "name": "reconciliation", "params": { "publisherMemberId": "pub-1" } }"#,
//! ).unwrap();
//!
//! let mut module = ReconciliationModule::new(page, slots, RecordingTransport::new());
//! assert!(module.init(&config));
//!
//! let targeting = module.get_targeting_data(&["/ad/unit"]);
//! assert_eq!(targeting["/ad/unit"].ad_unit_id, "/ad/unit");
//! ```

pub mod module;
pub mod slots;
pub mod types;

pub use module::ReconciliationModule;
pub use slots::{HostSlots, SlotDescriptor, SlotRegistry, resolve_slot_by_window};
pub use types::{ModuleConfig, ModuleParams, TargetingEntry};
