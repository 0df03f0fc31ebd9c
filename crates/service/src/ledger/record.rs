use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Whole persisted mapping: SteamID64 -> record.
pub type Ledger = BTreeMap<String, Record>;

/// Stored state for one identifier.
///
/// `balance` keeps the JSON number as submitted so `50` stays `50` and `12.5`
/// stays `12.5`. Fields missing on disk read back as their defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Record {
    pub balance: Number,
    pub banned: bool,
    pub warning: String,
}

impl Default for Record {
    fn default() -> Self {
        Self { balance: Number::from(0), banned: false, warning: String::new() }
    }
}

/// Response of a profile lookup: Steam profile data merged with the ledger record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub persona_name: String,
    pub avatar: String,
    pub level: u32,
    pub balance: Number,
    pub warning: String,
}
