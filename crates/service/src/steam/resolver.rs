use tracing::debug;

use super::{ProfileUrl, SteamApi, SteamError};
use crate::errors::ServiceError;

/// Public profile data for one SteamID64.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub steam_id: String,
    pub persona_name: String,
    pub avatar_url: String,
    pub level: u32,
}

/// Turn a profile URL into a SteamID64.
///
/// `/profiles/<id>` URLs resolve locally; `/id/<vanity>` URLs cost exactly one
/// `ResolveVanityURL` call. Nothing is cached.
pub async fn resolve_steam_id(api: &dyn SteamApi, raw_url: &str) -> Result<String, ServiceError> {
    match ProfileUrl::parse(raw_url)? {
        ProfileUrl::SteamId(id) => Ok(id),
        ProfileUrl::Vanity(vanity) => {
            let id = api.resolve_vanity(&vanity).await?;
            debug!(%vanity, steam_id = %id, "resolved vanity url");
            Ok(id)
        }
    }
}

/// Fetch summary and level concurrently. Either failure fails the whole fetch.
pub async fn fetch_profile(api: &dyn SteamApi, steam_id: &str) -> Result<Profile, SteamError> {
    let (summary, level) =
        tokio::try_join!(api.player_summary(steam_id), api.player_level(steam_id))?;
    Ok(Profile {
        steam_id: steam_id.to_string(),
        persona_name: summary.persona_name,
        avatar_url: summary.avatar_url,
        level,
    })
}
