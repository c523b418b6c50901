// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reconciliation module: targeting generation and the impression
//! listener.
//!
//! ## Overview
//!
//! [`ReconciliationModule`] owns three capabilities — a window graph, a
//! view of the host's slot registry, and a beacon transport — and wires the
//! two halves of the protocol across them. It is generic over all three, so
//! tests drive it with a simulated page and a recording transport.
//!
//! ## Listener lifecycle
//!
//! The impression listener is a process-wide, single-instance service in
//! the host page. Here that is an explicit [`start`](ReconciliationModule::start)
//! / [`stop`](ReconciliationModule::stop) pair: `start` is idempotent,
//! `init` starts the listener, and messages delivered while stopped are
//! dropped. Keeping the module to one instance is the host's obligation,
//! as it is for any host-framework submodule.

use std::collections::BTreeMap;

use reconcile_frames::types::WindowGraph;
use reconcile_frames::walk::find_top_iframe_window;
use reconcile_track::dispatch::{Transport, track_get, track_post};
use reconcile_track::encode::QueryMap;
use serde_json::json;
use uuid::Uuid;

use crate::slots::{SlotRegistry, resolve_slot_by_window};
use crate::types::{
    IMPRESSION_ENDPOINT, IMPRESSION_REQUEST_TYPE, INIT_ENDPOINT, ImpressionMessage, InitAdUnit,
    ModuleConfig, TARGETING_AD_UNIT_KEY, TARGETING_DELIVERY_KEY, TargetingEntry,
};

/// Correlates ad placements with out-of-band impression reports.
///
/// See the crate docs for the end-to-end workflow.
#[derive(Debug)]
pub struct ReconciliationModule<G, R, T>
where
    G: WindowGraph,
    R: SlotRegistry<G::Element>,
    T: Transport,
{
    graph: G,
    registry: R,
    transport: T,
    publisher_member_id: Option<String>,
    listening: bool,
}

impl<G, R, T> ReconciliationModule<G, R, T>
where
    G: WindowGraph,
    R: SlotRegistry<G::Element>,
    T: Transport,
{
    /// Create an inactive module over the given capabilities.
    ///
    /// The listener is not started and no publisher id is configured until
    /// [`init`](Self::init) runs.
    pub fn new(graph: G, registry: R, transport: T) -> Self {
        Self {
            graph,
            registry,
            transport,
            publisher_member_id: None,
            listening: false,
        }
    }

    /// Apply host configuration and start the impression listener.
    ///
    /// A missing or empty `publisherMemberId` is a configuration error: it
    /// is logged, but the module still reports success and stays active so
    /// a misconfigured page keeps working. Always returns `true`.
    pub fn init(&mut self, config: &ModuleConfig) -> bool {
        match config.params.publisher_member_id.as_deref() {
            Some(id) if !id.is_empty() => self.publisher_member_id = Some(id.to_string()),
            _ => log::error!(
                "reconciliation: publisherMemberId missing from module params; \
                 beacons will carry no publisher id"
            ),
        }
        self.start();
        true
    }

    /// Start the impression listener. Idempotent.
    pub fn start(&mut self) {
        self.listening = true;
    }

    /// Stop the impression listener; delivered messages are dropped until
    /// the next [`start`](Self::start).
    pub fn stop(&mut self) {
        self.listening = false;
    }

    /// True while the impression listener accepts messages.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Configured publisher id, if any.
    pub fn publisher_member_id(&self) -> Option<&str> {
        self.publisher_member_id.as_deref()
    }

    /// The window graph capability.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Mutable access to the window graph (simulation setup in tests).
    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    /// The slot registry view.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the slot registry view.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// The beacon transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue targeting for a sequence of ad-unit identifiers.
    ///
    /// Each identifier may be a slot code or a div id; codes are tried
    /// first. Empty identifiers and identifiers matching no slot produce no
    /// entry and no error. Every resolved slot gets a fresh delivery id,
    /// has `RSDK_AUID`/`RSDK_ADID` written into its targeting map for later
    /// impression validation, and contributes one entry to a single init
    /// announcement dispatched after the whole sequence (none when nothing
    /// resolved).
    ///
    /// The returned map is keyed by the identifier the caller asked with,
    /// not the resolved code.
    pub fn get_targeting_data(&mut self, ad_unit_ids: &[&str]) -> BTreeMap<String, TargetingEntry> {
        let mut entries = BTreeMap::new();
        let mut batch: Vec<InitAdUnit> = Vec::new();

        for &requested in ad_unit_ids {
            if requested.is_empty() {
                continue;
            }
            let slots = self.registry.slots();
            let Some(idx) = slots
                .iter()
                .position(|slot| slot.code == requested)
                .or_else(|| slots.iter().position(|slot| slot.div_id == requested))
            else {
                continue;
            };

            let delivery_id = Uuid::new_v4().to_string();
            let slot = &mut self.registry.slots_mut()[idx];
            let code = slot.code.clone();
            slot.set_targeting(TARGETING_AD_UNIT_KEY, code.clone());
            slot.set_targeting(TARGETING_DELIVERY_KEY, delivery_id.clone());

            batch.push(InitAdUnit {
                ad_unit_id: code.clone(),
                ad_delivery_id: delivery_id.clone(),
            });
            entries.insert(
                requested.to_string(),
                TargetingEntry {
                    ad_unit_id: code,
                    ad_delivery_id: delivery_id,
                },
            );
        }

        if !batch.is_empty() {
            let body = json!({
                "adUnits": batch,
                "publisherMemberId": self.publisher_member_id,
            });
            track_post(&self.transport, INIT_ENDPOINT, &body);
        }
        entries
    }

    /// Handle one cross-frame message event.
    ///
    /// `source` is the posting window as reported by the messaging channel;
    /// `payload` is its raw data. A message is forwarded as an impression
    /// beacon only when every gate passes: the listener is started, the
    /// source walks to an iframe directly under top, the payload parses to
    /// the impression shape with the exact protocol `type`, the walked
    /// window resolves to a slot, and that slot carries both targeting
    /// keys from an earlier targeting cycle. Every failed gate is a silent
    /// discard.
    ///
    /// The message origin is deliberately not validated against the slot's
    /// creative origin; identity of the walked window is the trust anchor.
    /// Tightening this would change which messages are accepted.
    pub fn on_message(&self, source: Option<G::Window>, payload: &str) {
        if !self.listening {
            return;
        }
        let Some(frame) = find_top_iframe_window(&self.graph, source) else {
            return;
        };
        let Ok(message) = serde_json::from_str::<ImpressionMessage>(payload) else {
            return;
        };
        if message.kind != IMPRESSION_REQUEST_TYPE {
            return;
        }
        let Some(slot) = resolve_slot_by_window(&self.graph, self.registry.slots(), frame) else {
            return;
        };
        let (Some(ad_unit_id), Some(ad_delivery_id)) = (
            slot.targeting_value(TARGETING_AD_UNIT_KEY),
            slot.targeting_value(TARGETING_DELIVERY_KEY),
        ) else {
            return;
        };

        let mut params = QueryMap::new();
        params.set("adUnitId", ad_unit_id);
        params.set("adDeliveryId", ad_delivery_id);
        params.set("sourceMemberId", message.args.source_member_id);
        params.set("sourceImpressionId", message.args.source_impression_id);
        params.set(
            "publisherMemberId",
            self.publisher_member_id.as_deref().unwrap_or(""),
        );
        track_get(&self.transport, IMPRESSION_ENDPOINT, &params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{HostSlots, SlotDescriptor};
    use crate::types::ModuleParams;
    use reconcile_frames::graph::PageGraph;
    use reconcile_frames::types::{ElementId, WindowId};
    use reconcile_track::recording::{RecordingTransport, TrackedCall};
    use std::collections::BTreeSet;

    type TestModule = ReconciliationModule<PageGraph, HostSlots<ElementId>, RecordingTransport>;

    fn config(publisher: Option<&str>) -> ModuleConfig {
        ModuleConfig {
            name: "reconciliation".to_string(),
            params: ModuleParams {
                publisher_member_id: publisher.map(str::to_string),
            },
        }
    }

    /// Page with one slot whose iframe chain is top -> ad_frame -> inner.
    fn fixture() -> (TestModule, WindowId, WindowId) {
        let mut page = PageGraph::new();
        let top = page.insert_window(None);
        let ad_frame = page.insert_window(Some(top));
        let inner = page.insert_window(Some(ad_frame));

        let slot_div = page.insert_element(None);
        page.insert_iframe(Some(slot_div), ad_frame);

        let mut slots = HostSlots::new();
        slots.push(SlotDescriptor::new(
            "/reconciliationAdunit",
            "reconciliationAd",
            Some(slot_div),
        ));

        let mut module = ReconciliationModule::new(page, slots, RecordingTransport::new());
        assert!(module.init(&config(Some("test_publisher"))));
        (module, ad_frame, inner)
    }

    fn impression_payload() -> String {
        r#"{ "type": "rsdk:impression:req",
             "args": { "sourceMemberId": "test_member_id", "sourceImpressionId": "123" } }"#
            .to_string()
    }

    #[test]
    fn init_reports_success_with_and_without_publisher_id() {
        let page = PageGraph::new();
        let mut module: TestModule =
            ReconciliationModule::new(page, HostSlots::new(), RecordingTransport::new());

        assert!(module.init(&config(None)));
        assert!(module.is_listening());
        assert_eq!(module.publisher_member_id(), None);

        assert!(module.init(&config(Some("pub-1"))));
        assert_eq!(module.publisher_member_id(), Some("pub-1"));
    }

    #[test]
    fn targeting_is_keyed_by_the_requested_identifier() {
        let (mut module, _, _) = fixture();

        let by_code = module.get_targeting_data(&["/reconciliationAdunit"]);
        assert_eq!(
            by_code["/reconciliationAdunit"].ad_unit_id,
            "/reconciliationAdunit"
        );

        let by_div = module.get_targeting_data(&["reconciliationAd"]);
        assert_eq!(
            by_div["reconciliationAd"].ad_unit_id,
            "/reconciliationAdunit"
        );
        assert!(!by_div["reconciliationAd"].ad_delivery_id.is_empty());
    }

    #[test]
    fn empty_and_unknown_identifiers_produce_no_entries() {
        let (mut module, _, _) = fixture();
        let targeting = module.get_targeting_data(&["reconciliationAd", "", "/no-such-unit"]);
        assert_eq!(targeting.len(), 1);
        assert!(targeting.contains_key("reconciliationAd"));
    }

    #[test]
    fn delivery_ids_are_fresh_on_every_generation() {
        let (mut module, _, _) = fixture();
        let mut seen = BTreeSet::new();
        for _ in 0..120 {
            let targeting = module.get_targeting_data(&["/reconciliationAdunit"]);
            seen.insert(targeting["/reconciliationAdunit"].ad_delivery_id.clone());
        }
        assert_eq!(seen.len(), 120, "every delivery id must be distinct");
    }

    #[test]
    fn one_resolved_identifier_triggers_exactly_one_init_post() {
        let (mut module, _, _) = fixture();
        let targeting = module.get_targeting_data(&["/reconciliationAdunit"]);

        let calls = module.transport().calls();
        assert_eq!(calls.len(), 1);
        let TrackedCall::Post { url, body } = &calls[0] else {
            panic!("expected a POST, got {calls:?}");
        };
        assert_eq!(url, INIT_ENDPOINT);
        assert_eq!(body["publisherMemberId"], "test_publisher");
        assert_eq!(body["adUnits"][0]["adUnitId"], "/reconciliationAdunit");
        assert_eq!(
            body["adUnits"][0]["adDeliveryId"],
            targeting["/reconciliationAdunit"].ad_delivery_id.as_str()
        );
    }

    #[test]
    fn unresolved_cycle_dispatches_nothing() {
        let (mut module, _, _) = fixture();
        let targeting = module.get_targeting_data(&["", "/no-such-unit"]);
        assert!(targeting.is_empty());
        assert!(module.transport().is_empty());
    }

    #[test]
    fn missing_publisher_id_is_sent_as_null_in_init() {
        let mut page = PageGraph::new();
        let top = page.insert_window(None);
        let ad_frame = page.insert_window(Some(top));
        let slot_div = page.insert_element(None);
        page.insert_iframe(Some(slot_div), ad_frame);
        let mut slots = HostSlots::new();
        slots.push(SlotDescriptor::new("/adunit", "ad-div", Some(slot_div)));

        let mut module = ReconciliationModule::new(page, slots, RecordingTransport::new());
        module.init(&config(None));
        module.get_targeting_data(&["/adunit"]);

        let calls = module.transport().calls();
        let TrackedCall::Post { body, .. } = &calls[0] else {
            panic!("expected a POST");
        };
        assert!(body["publisherMemberId"].is_null());
    }

    #[test]
    fn impression_from_stamped_slot_triggers_one_get() {
        let (mut module, _, inner) = fixture();
        let targeting = module.get_targeting_data(&["/reconciliationAdunit"]);
        let delivery_id = targeting["/reconciliationAdunit"].ad_delivery_id.clone();
        module.transport().take();

        // The creative posts from a window nested inside the ad iframe.
        module.on_message(Some(inner), &impression_payload());

        let calls = module.transport().calls();
        assert_eq!(calls.len(), 1);
        let TrackedCall::Get { url } = &calls[0] else {
            panic!("expected a GET, got {calls:?}");
        };
        let (endpoint, query) = url.split_once('?').unwrap();
        assert_eq!(endpoint, IMPRESSION_ENDPOINT);
        assert_eq!(
            query,
            format!(
                "adUnitId=%2FreconciliationAdunit&adDeliveryId={delivery_id}\
                 &sourceMemberId=test_member_id&sourceImpressionId=123\
                 &publisherMemberId=test_publisher"
            )
        );
    }

    #[test]
    fn impression_from_the_ad_frame_itself_also_resolves() {
        let (mut module, ad_frame, _) = fixture();
        module.get_targeting_data(&["/reconciliationAdunit"]);
        module.transport().take();

        module.on_message(Some(ad_frame), &impression_payload());
        assert_eq!(module.transport().len(), 1);
    }

    #[test]
    fn wrong_message_type_is_discarded() {
        let (mut module, _, inner) = fixture();
        module.get_targeting_data(&["/reconciliationAdunit"]);
        module.transport().take();

        module.on_message(
            Some(inner),
            r#"{ "type": "rsdk:other", "args": { "sourceMemberId": "m", "sourceImpressionId": "i" } }"#,
        );
        assert!(module.transport().is_empty());
    }

    #[test]
    fn malformed_payloads_are_discarded() {
        let (mut module, _, inner) = fixture();
        module.get_targeting_data(&["/reconciliationAdunit"]);
        module.transport().take();

        for payload in [
            "not json at all",
            "42",
            r#"{ "type": "rsdk:impression:req" }"#,
            r#"{ "type": "rsdk:impression:req", "args": { "sourceMemberId": "m" } }"#,
            r#"{ "type": "rsdk:impression:req",
                 "args": { "sourceMemberId": 1, "sourceImpressionId": "i" } }"#,
        ] {
            module.on_message(Some(inner), payload);
        }
        assert!(module.transport().is_empty());
    }

    #[test]
    fn message_without_a_source_window_is_discarded() {
        let (module, _, _) = fixture();
        module.on_message(None, &impression_payload());
        assert!(module.transport().is_empty());
    }

    #[test]
    fn message_from_a_window_matching_no_slot_is_discarded() {
        let (mut module, _, _) = fixture();
        module.get_targeting_data(&["/reconciliationAdunit"]);
        module.transport().take();

        // A separate iframe chain that no slot element contains.
        let stray_top = module.graph_mut().insert_window(None);
        let stray = module.graph_mut().insert_window(Some(stray_top));
        module.on_message(Some(stray), &impression_payload());
        assert!(module.transport().is_empty());
    }

    #[test]
    fn unstamped_slot_cannot_report_an_impression() {
        // No targeting cycle ran, so the slot has no RSDK_ADID to attribute.
        let (module, _, inner) = fixture();
        module.on_message(Some(inner), &impression_payload());
        assert!(module.transport().is_empty());
    }

    #[test]
    fn stopped_listener_drops_messages_and_start_restores_it() {
        let (mut module, _, inner) = fixture();
        module.get_targeting_data(&["/reconciliationAdunit"]);
        module.transport().take();

        module.stop();
        module.on_message(Some(inner), &impression_payload());
        assert!(module.transport().is_empty());

        module.start();
        module.start(); // idempotent; must not duplicate delivery
        module.on_message(Some(inner), &impression_payload());
        assert_eq!(module.transport().len(), 1);
    }

    #[test]
    fn missing_publisher_id_is_sent_as_empty_string_in_impressions() {
        let mut page = PageGraph::new();
        let top = page.insert_window(None);
        let ad_frame = page.insert_window(Some(top));
        let slot_div = page.insert_element(None);
        page.insert_iframe(Some(slot_div), ad_frame);
        let mut slots = HostSlots::new();
        slots.push(SlotDescriptor::new("/adunit", "ad-div", Some(slot_div)));

        let mut module = ReconciliationModule::new(page, slots, RecordingTransport::new());
        module.init(&config(None));
        module.get_targeting_data(&["/adunit"]);
        module.transport().take();

        module.on_message(Some(ad_frame), &impression_payload());
        let calls = module.transport().calls();
        let TrackedCall::Get { url } = &calls[0] else {
            panic!("expected a GET");
        };
        assert!(url.ends_with("publisherMemberId="));
    }

    #[test]
    fn second_targeting_cycle_rotates_the_delivery_id_read_by_impressions() {
        let (mut module, _, inner) = fixture();
        module.get_targeting_data(&["/reconciliationAdunit"]);
        let second = module.get_targeting_data(&["/reconciliationAdunit"]);
        let rotated = second["/reconciliationAdunit"].ad_delivery_id.clone();
        module.transport().take();

        module.on_message(Some(inner), &impression_payload());
        let calls = module.transport().calls();
        let TrackedCall::Get { url } = &calls[0] else {
            panic!("expected a GET");
        };
        assert!(
            url.contains(&format!("adDeliveryId={rotated}")),
            "impression must carry the latest delivery id"
        );
    }
}
