use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{datetime_millis, de_bool_from_any, de_opt_string_from_any};

/// A financial service provider registered with the ledger.
///
/// Identity is `name`; transfers reference it via `payerFsp`/`payeeFsp`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, deserialize_with = "de_opt_string_from_any")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_bool_from_any")]
    pub is_active: bool,
    #[serde(default, with = "datetime_millis")]
    pub created: Option<DateTime<Utc>>,
    /// Set by the create endpoint: false means the name already existed.
    #[serde(default)]
    pub newly_created: bool,
    #[serde(default)]
    pub links: Option<Links>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
}

/// A per-currency ledger account owned by exactly one participant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, deserialize_with = "de_opt_string_from_any")]
    pub id: Option<String>,
    #[serde(default)]
    pub ledger_account_type: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_bool_from_any")]
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, with = "datetime_millis")]
    pub created_date: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn named(name: &str, currency: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            currency: Some(currency.to_string()),
            ..Default::default()
        }
    }
}
