use std::sync::Arc;

use serde_json::Number;
use tracing::{info, instrument, warn};

use common::observability::{BANNED_LOOKUPS_TOTAL, LOOKUPS_TOTAL, RECORDS_CREATED_TOTAL};

use super::{Ledger, ProfileView, Record};
use crate::errors::ServiceError;
use crate::steam::{fetch_profile, resolve_steam_id, SteamApi};
use crate::storage::RecordStore;

pub const BANNED: &str = "This user is banned.";
pub const USER_NOT_FOUND: &str = "User not found";

/// Ledger operations over an injected record store and Steam API.
///
/// Every call reloads the full ledger; mutating calls write it back in full.
/// Two concurrent mutations may interleave and the later save wins.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn RecordStore>,
    steam: Arc<dyn SteamApi>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn RecordStore>, steam: Arc<dyn SteamApi>) -> Self {
        Self { store, steam }
    }

    /// Load, let `f` mutate, save. Nothing is written when `f` fails.
    async fn modify<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Ledger) -> Result<R, ServiceError>,
    {
        let mut ledger = self.store.load().await?;
        let out = f(&mut ledger)?;
        self.store.save(&ledger).await?;
        Ok(out)
    }

    /// Resolve the profile, refuse banned ids, create a default record on first
    /// sight, then fetch the public profile.
    #[instrument(skip(self))]
    pub async fn lookup(&self, profile_url: &str) -> Result<ProfileView, ServiceError> {
        LOOKUPS_TOTAL.inc();
        let steam_id = resolve_steam_id(self.steam.as_ref(), profile_url).await?;

        let mut ledger = self.store.load().await?;
        let record = match ledger.get(&steam_id) {
            Some(rec) if rec.banned => {
                BANNED_LOOKUPS_TOTAL.inc();
                warn!(%steam_id, "lookup denied for banned user");
                return Err(ServiceError::Forbidden(BANNED.into()));
            }
            Some(rec) => rec.clone(),
            None => {
                let rec = Record::default();
                ledger.insert(steam_id.clone(), rec.clone());
                self.store.save(&ledger).await?;
                RECORDS_CREATED_TOTAL.inc();
                info!(%steam_id, "created record on first lookup");
                rec
            }
        };

        let profile = fetch_profile(self.steam.as_ref(), &steam_id).await?;
        Ok(ProfileView {
            id: steam_id,
            persona_name: profile.persona_name,
            avatar: profile.avatar_url,
            level: profile.level,
            balance: record.balance,
            warning: record.warning,
        })
    }

    pub async fn list(&self) -> Result<Ledger, ServiceError> {
        Ok(self.store.load().await?)
    }

    /// Create-or-update; only `balance` changes.
    #[instrument(skip(self))]
    pub async fn set_balance(&self, id: &str, balance: Number) -> Result<(), ServiceError> {
        self.modify(|ledger| {
            ledger.entry(id.to_string()).or_default().balance = balance;
            Ok(())
        })
        .await?;
        info!(steam_id = %id, "balance updated");
        Ok(())
    }

    /// Create-or-update balance and warning; `banned` is left as is.
    #[instrument(skip(self))]
    pub async fn set_user(&self, id: &str, balance: Option<Number>, warning: String) -> Result<(), ServiceError> {
        self.modify(|ledger| {
            let rec = ledger.entry(id.to_string()).or_default();
            rec.balance = balance.unwrap_or_else(|| Number::from(0));
            rec.warning = warning;
            Ok(())
        })
        .await?;
        info!(steam_id = %id, "user updated");
        Ok(())
    }

    /// Flip `banned`, creating a default record first if needed. Returns the new value.
    #[instrument(skip(self))]
    pub async fn toggle_ban(&self, id: &str) -> Result<bool, ServiceError> {
        let banned = self
            .modify(|ledger| {
                let rec = ledger.entry(id.to_string()).or_default();
                rec.banned = !rec.banned;
                Ok(rec.banned)
            })
            .await?;
        info!(steam_id = %id, banned, "ban toggled");
        Ok(banned)
    }

    /// Warning text, or empty when there is no record.
    pub async fn warning(&self, id: &str) -> Result<String, ServiceError> {
        let ledger = self.store.load().await?;
        Ok(ledger.get(id).map(|r| r.warning.clone()).unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<(), ServiceError> {
        self.modify(|ledger| match ledger.remove(id) {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(USER_NOT_FOUND)),
        })
        .await?;
        info!(steam_id = %id, "user removed");
        Ok(())
    }

    /// Resolve the profile URL and overwrite its record with the given fields and `banned = false`.
    #[instrument(skip(self))]
    pub async fn add_user(
        &self,
        profile_url: &str,
        balance: Option<Number>,
        warning: String,
    ) -> Result<String, ServiceError> {
        let steam_id = resolve_steam_id(self.steam.as_ref(), profile_url).await?;
        let record = Record { balance: balance.unwrap_or_else(|| Number::from(0)), banned: false, warning };
        self.modify(|ledger| {
            ledger.insert(steam_id.clone(), record);
            Ok(())
        })
        .await?;
        info!(%steam_id, "user added");
        Ok(steam_id)
    }
}
