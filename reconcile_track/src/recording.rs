// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A transport that records calls instead of sending them.
//!
//! Used by the test suites and demos to assert on dispatched beacons
//! without any wire traffic. Interior mutability is a `RefCell`: dispatch
//! runs on a single event-loop thread by design, so the recorder is not
//! `Sync` and does not try to be.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use serde_json::Value;

use crate::dispatch::Transport;

/// One captured dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackedCall {
    /// A pixel-style GET with its full URL (endpoint plus encoded query).
    Get {
        /// Complete request URL.
        url: String,
    },
    /// A POST with its endpoint and JSON body.
    Post {
        /// Request URL.
        url: String,
        /// Structured body as handed to the transport.
        body: Value,
    },
}

/// Capturing [`Transport`] implementation.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: RefCell<Vec<TrackedCall>>,
}

impl RecordingTransport {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured calls, in dispatch order.
    pub fn calls(&self) -> Vec<TrackedCall> {
        self.calls.borrow().clone()
    }

    /// Drain and return the captured calls.
    pub fn take(&self) -> Vec<TrackedCall> {
        self.calls.borrow_mut().split_off(0)
    }

    /// Number of captured calls.
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// True if nothing has been dispatched.
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}

impl Transport for RecordingTransport {
    fn send_get(&self, url: &str) {
        self.calls.borrow_mut().push(TrackedCall::Get {
            url: url.to_string(),
        });
    }

    fn send_post(&self, url: &str, body: &Value) {
        self.calls.borrow_mut().push(TrackedCall::Post {
            url: url.to_string(),
            body: body.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_captured_calls() {
        let transport = RecordingTransport::new();
        transport.send_get("https://confirm.example.com/imp?a=1");
        assert_eq!(transport.len(), 1);

        let taken = transport.take();
        assert_eq!(taken.len(), 1);
        assert!(transport.is_empty());
    }

    #[test]
    fn calls_are_kept_in_dispatch_order() {
        let transport = RecordingTransport::new();
        transport.send_get("https://a.example.com/?n=1");
        transport.send_get("https://a.example.com/?n=2");
        let calls = transport.calls();
        assert!(matches!(&calls[0], TrackedCall::Get { url } if url.ends_with("n=1")));
        assert!(matches!(&calls[1], TrackedCall::Get { url } if url.ends_with("n=2")));
    }
}
