// Copyright 2026 the Reconcile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol constants, configuration surface, and wire shapes.

use serde::{Deserialize, Serialize};

/// `type` value an inbound message must carry to be treated as an
/// impression report. Anything else is silently ignored.
pub const IMPRESSION_REQUEST_TYPE: &str = "rsdk:impression:req";

/// Targeting key holding the resolved slot's ad-unit path.
pub const TARGETING_AD_UNIT_KEY: &str = "RSDK_AUID";

/// Targeting key holding the per-render delivery id.
pub const TARGETING_DELIVERY_KEY: &str = "RSDK_ADID";

/// Confirmation endpoint announced to once per targeting cycle.
pub const INIT_ENDPOINT: &str = "https://confirm.fiduciadlt.com/init";

/// Confirmation endpoint receiving verified impression beacons.
pub const IMPRESSION_ENDPOINT: &str = "https://confirm.fiduciadlt.com/imp";

/// Module configuration as handed over by the host framework.
///
/// The host routes by `name` (`"reconciliation"` for this module); the
/// module itself only consumes `params`.
#[derive(Clone, Debug, Deserialize)]
pub struct ModuleConfig {
    /// Module name used by the host framework for routing.
    pub name: String,
    /// Module parameters.
    #[serde(default)]
    pub params: ModuleParams,
}

/// Parameters of [`ModuleConfig`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleParams {
    /// Identifies the publisher to the confirmation endpoint. Absence is a
    /// configuration error but does not deactivate the module.
    #[serde(default)]
    pub publisher_member_id: Option<String>,
}

/// Targeting pair issued for one resolved ad unit in one targeting cycle.
///
/// Serializes to the wire keys the creative-side tag reads back
/// (`RSDK_AUID` / `RSDK_ADID`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TargetingEntry {
    /// Resolved slot's ad-unit path.
    #[serde(rename = "RSDK_AUID")]
    pub ad_unit_id: String,
    /// Freshly generated delivery id, unique per generation call.
    #[serde(rename = "RSDK_ADID")]
    pub ad_delivery_id: String,
}

/// Untrusted inbound cross-frame message.
///
/// Deserialization is the shape gate: `type` and both `args` fields must be
/// present as strings, or the message is discarded. Unknown extra fields
/// are tolerated.
#[derive(Clone, Debug, Deserialize)]
pub struct ImpressionMessage {
    /// Protocol discriminator; must equal [`IMPRESSION_REQUEST_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Creative-supplied identifiers, passed through verbatim.
    pub args: ImpressionArgs,
}

/// Arguments of an [`ImpressionMessage`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpressionArgs {
    /// Opaque member id asserted by the creative.
    pub source_member_id: String,
    /// Opaque impression id asserted by the creative.
    pub source_impression_id: String,
}

/// One ad unit entry in the init announcement body.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitAdUnit {
    /// Resolved slot's ad-unit path.
    pub ad_unit_id: String,
    /// Delivery id issued for this render.
    pub ad_delivery_id: String,
}
