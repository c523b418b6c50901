// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconcile Track: fire-and-forget tracking beacons.
//!
//! ## Overview
//!
//! This crate carries the outbound half of the reconciliation protocol:
//! serializing flat-or-nested key/value parameters into a percent-encoded
//! query string, and handing the result to a [`Transport`](crate::dispatch::Transport)
//! for delivery. It knows nothing about slots, windows, or message shapes.
//!
//! ## Dispatch model
//!
//! Both operations are send-and-forget. Callers never observe completion or
//! failure, and nothing here retries: a slow or failing endpoint must not be
//! able to block or break the page that loaded the module.
//!
//! - [`track_get`](crate::dispatch::track_get) encodes parameters with
//!   [`stringify`](crate::encode::stringify) and issues a pixel-style GET.
//! - [`track_post`](crate::dispatch::track_post) forwards a structured JSON
//!   body unchanged.
//!
//! The actual wire mechanics live behind [`Transport`](crate::dispatch::Transport);
//! a browser bridge, an HTTP client, and the in-tree
//! [`RecordingTransport`](crate::recording::RecordingTransport) are all valid
//! implementations.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatch;
pub mod encode;
pub mod recording;
