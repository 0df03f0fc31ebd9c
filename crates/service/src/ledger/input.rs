//! JSON request bodies and their validation.
//!
//! Bodies accept both `id`/`profileUrl` and the older `steamId`/`steamUrl`
//! names. An empty string counts as missing. A numeric id is keyed by its
//! decimal text.

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::errors::ServiceError;

pub const MISSING_ID: &str = "Missing steamId";
pub const INVALID_DATA: &str = "Invalid data";
pub const MISSING_PROFILE_URL: &str = "Missing Steam profile URL";

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Record key for an `id` field: a non-empty string, or a number's text.
fn id_key(v: &Option<Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// `Some` only when the value is a JSON number.
pub fn numeric(v: &Option<Value>) -> Option<Number> {
    match v {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

/// The string value, or empty for absent, null or non-string values.
pub fn text_or_empty(v: &Option<Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdInput {
    #[serde(default, alias = "steamId")]
    pub id: Option<Value>,
}

impl IdInput {
    pub fn require_id(&self) -> Result<String, ServiceError> {
        id_key(&self.id).ok_or_else(|| ServiceError::validation(MISSING_ID))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceInput {
    #[serde(default, alias = "steamId")]
    pub id: Option<Value>,
    #[serde(default)]
    pub balance: Option<Value>,
}

impl BalanceInput {
    /// Both the id and a numeric balance are required.
    pub fn validate(&self) -> Result<(String, Number), ServiceError> {
        match (id_key(&self.id), numeric(&self.balance)) {
            (Some(id), Some(balance)) => Ok((id, balance)),
            _ => Err(ServiceError::validation(INVALID_DATA)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(default, alias = "steamId")]
    pub id: Option<Value>,
    #[serde(default)]
    pub balance: Option<Value>,
    #[serde(default)]
    pub warning: Option<Value>,
}

impl UserInput {
    pub fn require_id(&self) -> Result<String, ServiceError> {
        id_key(&self.id).ok_or_else(|| ServiceError::validation(MISSING_ID))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupInput {
    #[serde(default, alias = "steamUrl")]
    pub profile_url: Option<String>,
}

impl LookupInput {
    pub fn profile_url(&self) -> Option<&str> {
        present(&self.profile_url)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserInput {
    #[serde(default, alias = "steamUrl")]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub balance: Option<Value>,
    #[serde(default)]
    pub warning: Option<Value>,
}

impl AddUserInput {
    pub fn require_profile_url(&self) -> Result<&str, ServiceError> {
        present(&self.profile_url).ok_or_else(|| ServiceError::validation(MISSING_PROFILE_URL))
    }
}
