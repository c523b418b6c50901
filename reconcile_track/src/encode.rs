// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query-string encoding for tracking parameters.
//!
//! ## Overview
//!
//! [`QueryMap`] is an insertion-ordered list of key/value parameters where a
//! value is either a scalar or a nested map. [`stringify`] joins entries with
//! `&`, percent-encoding each key and value.
//!
//! ## Nesting
//!
//! A nested map is stringified first and the resulting inner query string is
//! then percent-encoded as a whole. The double encoding is intentional: from
//! the outer encoder's perspective a nested structure is one opaque scalar,
//! and the receiving endpoint decodes it back into a query string itself.

use alloc::string::String;
use alloc::vec::Vec;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped in keys and values.
///
/// Matches the component encoding browsers apply: alphanumerics and
/// `- _ . ! ~ * ' ( )` pass through, everything else becomes `%XX`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A single parameter value: a scalar string or a nested parameter map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    /// Plain value, encoded directly.
    Scalar(String),
    /// Nested map, stringified and then encoded as one opaque value.
    Nested(QueryMap),
}

/// Insertion-ordered key/value parameters for a tracking call.
///
/// Keys are not deduplicated; callers control both order and multiplicity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
}

impl QueryMap {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a scalar parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((key.into(), QueryValue::Scalar(value.into())));
    }

    /// Append a nested parameter map.
    pub fn set_nested(&mut self, key: impl Into<String>, value: QueryMap) {
        self.entries.push((key.into(), QueryValue::Nested(value)));
    }

    /// True if no parameters have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[(String, QueryValue)] {
        &self.entries
    }
}

/// Serialize `params` into a `key1=value1&key2=value2` query string.
///
/// Keys and values are percent-encoded with the component set; nested maps
/// are stringified recursively and encoded whole (see module docs).
pub fn stringify(params: &QueryMap) -> String {
    let mut out = String::new();
    for (key, value) in &params.entries {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&encode_component(key));
        out.push('=');
        match value {
            QueryValue::Scalar(v) => out.push_str(&encode_component(v)),
            QueryValue::Nested(inner) => out.push_str(&encode_component(&stringify(inner))),
        }
    }
    out
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).collect()
}
