// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Send-and-forget dispatch over a transport capability.
//!
//! ## Overview
//!
//! [`Transport`] is the seam between this crate and the host environment.
//! The two free functions compose the request and hand it over; neither
//! returns anything, and neither retries. Transport failures are invisible
//! here by contract.

use alloc::format;

use serde_json::Value;

use crate::encode::{QueryMap, stringify};

/// Send-and-forget wire primitives supplied by the host environment.
///
/// Implementations must not panic: a failing beacon must never break the
/// page. There is deliberately no way to report an error back to callers.
pub trait Transport {
    /// Pixel-style GET. `url` already carries the encoded query string.
    fn send_get(&self, url: &str);

    /// POST with a structured JSON body.
    fn send_post(&self, url: &str, body: &Value);
}

/// Encode `params` and issue a pixel-style GET to `endpoint`.
///
/// The request URL is `endpoint?query`; no response is consumed.
pub fn track_get(transport: &dyn Transport, endpoint: &str, params: &QueryMap) {
    let url = format!("{endpoint}?{}", stringify(params));
    transport.send_get(&url);
}

/// Issue a POST carrying `body` to `endpoint`.
pub fn track_post(transport: &dyn Transport, endpoint: &str, body: &Value) {
    transport.send_post(endpoint, body);
}
