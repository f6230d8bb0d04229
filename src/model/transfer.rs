use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::datetime_millis;

/// A two-phase transfer between two participants.
///
/// `transferId` is generated client-side before the first network call and
/// must round-trip through the ledger unchanged. `ilpPacket` and
/// `condition` are opaque to the harness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    #[serde(default)]
    pub transfer_id: Option<String>,
    /// True when the ledger should fulfil immediately after the prepare.
    #[serde(default)]
    pub fulfil: bool,
    #[serde(default)]
    pub payer_fsp: Option<String>,
    #[serde(default)]
    pub payee_fsp: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub ilp_packet: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default, with = "datetime_millis")]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extension_list: Option<Vec<Extension>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Amount {
    pub currency: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extension {
    pub key: String,
    pub value: String,
}
